use std::fmt::{self, Debug};
use std::io;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::pal::MockPlatform;
use crate::pal::{BUILD_TARGET_PLATFORM, BuildTargetPlatform, Platform};
use crate::ProcessorId;

/// Enum to hide the real/mock choice behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum PlatformFacade {
    Target(&'static BuildTargetPlatform),

    #[cfg(test)]
    Mock(Arc<MockPlatform>),
}

impl PlatformFacade {
    pub(crate) fn target() -> Self {
        Self::Target(&BUILD_TARGET_PLATFORM)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockPlatform) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

impl Platform for PlatformFacade {
    fn topology_enumeration(&self) -> io::Result<String> {
        match self {
            Self::Target(p) => p.topology_enumeration(),
            #[cfg(test)]
            Self::Mock(p) => p.topology_enumeration(),
        }
    }

    fn online_processor_list(&self) -> io::Result<String> {
        match self {
            Self::Target(p) => p.online_processor_list(),
            #[cfg(test)]
            Self::Mock(p) => p.online_processor_list(),
        }
    }

    fn online_processor_count(&self) -> io::Result<usize> {
        match self {
            Self::Target(p) => p.online_processor_count(),
            #[cfg(test)]
            Self::Mock(p) => p.online_processor_count(),
        }
    }

    fn current_thread_processors(&self) -> io::Result<Vec<ProcessorId>> {
        match self {
            Self::Target(p) => p.current_thread_processors(),
            #[cfg(test)]
            Self::Mock(p) => p.current_thread_processors(),
        }
    }

    fn pin_current_thread_to(&self, processor_id: ProcessorId) -> io::Result<()> {
        match self {
            Self::Target(p) => p.pin_current_thread_to(processor_id),
            #[cfg(test)]
            Self::Mock(p) => p.pin_current_thread_to(processor_id),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))] // No API contract to test.
impl Debug for PlatformFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
