/// Identifies a specific logical processor.
///
/// This will match the numeric identifier used by standard tooling of the operating system.
///
/// It is important to highlight that the values used are not guaranteed to be sequential/contiguous
/// or to start from zero (aspects that are also not guaranteed by operating system tooling).
pub type ProcessorId = u32;

/// Identifies a physical processor package (socket).
///
/// This matches the physical socket ID reported by `lscpu -y`.
pub type SocketId = u32;

/// Identifies a physical core. Logical processors that share a core are hyper-thread siblings.
///
/// This matches the physical core ID reported by `lscpu -y`, which is only unique within a socket.
pub type CoreId = u32;
