use std::io;
use std::num::NonZero;
use std::thread;

use crate::ProcessorId;
use crate::pal::Platform;

/// Fallback platform implementation for operating systems without native support.
///
/// There is no hierarchical enumeration and no online processor list. The processor count comes
/// from `std::thread::available_parallelism()` and pinning pretends to succeed without changing
/// anything, as pinning is only a performance hint.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetPlatform;

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

impl Platform for BuildTargetPlatform {
    fn topology_enumeration(&self) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "hierarchical topology enumeration is not supported on this platform",
        ))
    }

    fn online_processor_list(&self) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "listing online processors is not supported on this platform",
        ))
    }

    fn online_processor_count(&self) -> io::Result<usize> {
        thread::available_parallelism().map(NonZero::get)
    }

    fn current_thread_processors(&self) -> io::Result<Vec<ProcessorId>> {
        let count = ProcessorId::try_from(self.online_processor_count()?)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok((0..count).collect())
    }

    fn pin_current_thread_to(&self, _processor_id: ProcessorId) -> io::Result<()> {
        Ok(())
    }
}
