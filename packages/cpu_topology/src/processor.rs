use std::fmt::{self, Display};

use derive_more::derive::Display as DisplayDerive;

use crate::{CoreId, ProcessorId, SocketId};

/// The physical placement of a logical processor: which socket and which core it belongs to.
#[derive(Clone, Copy, Debug, DisplayDerive, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("socket {socket}, core {core}")]
pub struct Location {
    socket: SocketId,
    core: CoreId,
}

impl Location {
    /// Creates a location from a physical socket ID and a physical core ID.
    #[must_use]
    pub const fn new(socket: SocketId, core: CoreId) -> Self {
        Self { socket, core }
    }

    /// The physical socket (processor package) the processor belongs to.
    #[must_use]
    #[inline]
    pub const fn socket(&self) -> SocketId {
        self.socket
    }

    /// The physical core the processor belongs to. Only unique within a socket.
    #[must_use]
    #[inline]
    pub const fn core(&self) -> CoreId {
        self.core
    }
}

/// A logical processor available to the current process.
///
/// A processor discovered via the flat strategy has no [`Location`] because the operating system
/// was only asked how many processors there are, not how they are arranged.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Processor {
    id: ProcessorId,
    location: Option<Location>,
}

impl Processor {
    /// Creates a processor without any socket/core information.
    #[must_use]
    pub const fn new(id: ProcessorId) -> Self {
        Self { id, location: None }
    }

    /// Creates a processor that is known to sit on a specific socket and core.
    #[must_use]
    pub const fn with_location(id: ProcessorId, location: Location) -> Self {
        Self {
            id,
            location: Some(location),
        }
    }

    /// The unique numeric ID of the processor, matching the ID used by operating system tools.
    #[cfg_attr(test, mutants::skip)] // Trivial accessor, do not waste time on mutation.
    #[must_use]
    #[inline]
    pub const fn id(&self) -> ProcessorId {
        self.id
    }

    /// Where the processor sits in the socket/core hierarchy, if known.
    #[cfg_attr(test, mutants::skip)] // Trivial accessor, do not waste time on mutation.
    #[must_use]
    #[inline]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }
}

impl Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "processor {} [{location}]", self.id),
            None => write!(f, "processor {}", self.id),
        }
    }
}
