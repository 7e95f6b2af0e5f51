use std::fmt::Debug;
use std::io;

use crate::ProcessorId;

/// Operating system capabilities the topology logic depends on.
///
/// Every method is a direct, uninterpreted query or command. Parsing, ordering and error
/// classification happen in the public API layer so that they can be tested against a mock.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// The raw text of the hierarchical socket/core/processor enumeration
    /// (`lscpu -p=socket,core,cpu -y`), including its header lines.
    fn topology_enumeration(&self) -> io::Result<String>;

    /// The raw text of the list of online logical processors, as comma-separated IDs and
    /// inclusive ranges (e.g. `0-3,6`).
    fn online_processor_list(&self) -> io::Result<String>;

    /// The number of online logical processors.
    fn online_processor_count(&self) -> io::Result<usize>;

    /// The processors the affinity mask of the current thread allows it to run on.
    fn current_thread_processors(&self) -> io::Result<Vec<ProcessorId>>;

    /// Restricts the current thread to only execute on the given processor.
    fn pin_current_thread_to(&self, processor_id: ProcessorId) -> io::Result<()>;
}
