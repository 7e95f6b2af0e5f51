//! Public handle to the operating system's processor topology, supporting both the real platform
//! and (in unit tests) a mock platform.

use std::fmt::{self, Display};
use std::io;
use std::str::FromStr;

use foldhash::HashSet;
use tracing::{debug, warn};

use crate::pal::{Platform, PlatformFacade};
use crate::{
    Error, LSCPU_HEADER_LINES, Processor, ProcessorId, ProcessorSet, Result, parse_enumeration,
    parse_processor_list, spread_across_cores,
};

/// How to find out which processors are available.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TopologyStrategy {
    /// Use the hierarchical enumeration if available, otherwise fall back to the flat processor
    /// count.
    #[default]
    Auto,

    /// Use the socket/core/processor enumeration, spreading processors across cores. Failure to
    /// obtain or parse the enumeration is an error.
    Hierarchical,

    /// Only ask which processors are online, or how many if the operating system cannot list
    /// them, in which case they are assumed to be numbered from zero without gaps. Processors
    /// are listed in numeric order and carry no socket/core information.
    Flat,
}

impl Display for TopologyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Hierarchical => "hierarchical",
            Self::Flat => "flat",
        })
    }
}

impl FromStr for TopologyStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "hierarchical" => Ok(Self::Hierarchical),
            "flat" => Ok(Self::Flat),
            _ => Err(Error::UnknownStrategy {
                name: s.to_string(),
            }),
        }
    }
}

/// Handle to the processor topology of the operating system.
///
/// Cloning the handle is cheap and clones may be freely sent to other threads, e.g. so that
/// each worker thread can pin itself.
///
/// # Example
///
/// ```
/// use std::thread;
///
/// use cpu_topology::{SystemTopology, TopologyStrategy};
///
/// let topology = SystemTopology::current();
/// let processors = topology.discover(TopologyStrategy::Flat).unwrap();
/// let first = *processors.processors().first();
///
/// thread::spawn(move || {
///     // Pinning is a performance hint, so a failure is worth a message but nothing more.
///     if let Err(e) = topology.pin_current_thread_to(&first) {
///         println!("running unpinned: {e}");
///     }
/// })
/// .join()
/// .unwrap();
/// ```
#[derive(Clone)]
pub struct SystemTopology {
    platform: PlatformFacade,
}

impl SystemTopology {
    /// Returns a handle to the topology of the real operating system.
    #[must_use]
    pub fn current() -> Self {
        Self {
            platform: PlatformFacade::target(),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_platform(platform: PlatformFacade) -> Self {
        Self { platform }
    }

    /// Discovers the processors available to the process using the given strategy.
    ///
    /// Each call queries the operating system again. Callers are expected to discover once and
    /// pass the resulting immutable [`ProcessorSet`] to whoever needs it.
    ///
    /// # Errors
    ///
    /// Returns an error if the operating system query required by the strategy fails or, for the
    /// hierarchical strategy, if the enumeration is empty or malformed. With
    /// [`TopologyStrategy::Auto`], an error is only returned if both strategies fail, in which
    /// case the error from the flat strategy is returned.
    pub fn discover(&self, strategy: TopologyStrategy) -> Result<ProcessorSet> {
        let processors = match strategy {
            TopologyStrategy::Hierarchical => self.discover_hierarchical()?,
            TopologyStrategy::Flat => self.discover_flat()?,
            TopologyStrategy::Auto => match self.discover_hierarchical() {
                Ok(processors) => processors,
                Err(e) => {
                    warn!(
                        error = %e,
                        "hierarchical topology discovery failed; falling back to flat discovery"
                    );
                    self.discover_flat()?
                }
            },
        };

        debug!(%strategy, %processors, "discovered processors");

        Ok(processors)
    }

    fn discover_hierarchical(&self) -> Result<ProcessorSet> {
        let text = self
            .platform
            .topology_enumeration()
            .map_err(|e| Error::unavailable("enumerating sockets, cores and processors", e))?;

        let listed = parse_enumeration(&text, LSCPU_HEADER_LINES)?;

        ProcessorSet::from_processors(spread_across_cores(listed)).ok_or(Error::EmptyEnumeration)
    }

    fn discover_flat(&self) -> Result<ProcessorSet> {
        if let Some(processors) = self.listed_online_processors() {
            return Ok(processors);
        }

        let count = self
            .platform
            .online_processor_count()
            .map_err(|e| Error::unavailable("counting online processors", e))?;

        let count = ProcessorId::try_from(count).unwrap_or(ProcessorId::MAX);

        ProcessorSet::from_processors((0..count).map(Processor::new)).ok_or_else(|| {
            Error::unavailable(
                "counting online processors",
                io::Error::other("operating system reported zero online processors"),
            )
        })
    }

    fn listed_online_processors(&self) -> Option<ProcessorSet> {
        let listed = self
            .platform
            .online_processor_list()
            .map_err(|e| Error::unavailable("listing online processors", e))
            .and_then(|text| parse_processor_list(&text));

        match listed {
            Ok(ids) => ProcessorSet::from_processors(ids.into_iter().map(Processor::new)),
            Err(e) => {
                debug!(
                    error = %e,
                    "no usable online processor list; assuming processors are numbered from zero"
                );
                None
            }
        }
    }

    /// Returns the processors of `processors` that the affinity mask of the current thread
    /// allows it to run on, preserving order.
    ///
    /// This is how soft limits imposed from outside the process (e.g. `taskset` on Linux) are
    /// honored. Returns `Ok(None)` if none of the processors are allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the affinity mask of the current thread cannot be queried.
    pub fn where_available_for_current_thread(
        &self,
        processors: &ProcessorSet,
    ) -> Result<Option<ProcessorSet>> {
        let allowed = self
            .platform
            .current_thread_processors()
            .map_err(|e| Error::unavailable("querying the affinity mask of the current thread", e))?
            .into_iter()
            .collect::<HashSet<_>>();

        Ok(processors.filter(|processor| allowed.contains(&processor.id())))
    }

    /// Restricts the current thread to only execute on the given processor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinningFailed`] if the operating system refuses the request, e.g.
    /// because the processor is offline or outside the affinity limits of the process.
    pub fn pin_current_thread_to(&self, processor: &Processor) -> Result<()> {
        self.platform
            .pin_current_thread_to(processor.id())
            .map_err(|source| Error::PinningFailed {
                processor_id: processor.id(),
                source,
            })
    }
}

#[cfg_attr(coverage_nightly, coverage(off))] // No API contract to test.
impl fmt::Debug for SystemTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemTopology")
            .field("platform", &self.platform)
            .finish()
    }
}
