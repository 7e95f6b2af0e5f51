#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Discovers the logical processors available to the current process and hands them out in an
//! order that spreads work across physical cores before doubling up on hyper-thread siblings.
//!
//! # Why should one care?
//!
//! When a fixed number of threads compete for compute capacity, placing two of them on sibling
//! logical processors of the same physical core makes them share execution units and caches. If
//! there are idle cores elsewhere, that is wasted capacity. Ordering processors so that consecutive
//! entries land on different cores means that "take the first N processors" is a good placement
//! for any N.
//!
//! # Discovery strategies
//!
//! Two strategies are offered, ranked by fidelity:
//!
//! 1. [`TopologyStrategy::Hierarchical`] reads the socket/core/processor enumeration reported by
//!    `lscpu` and orders the processors socket by socket, sweeping across the cores of each socket
//!    and taking one unused processor from each core per sweep.
//! 1. [`TopologyStrategy::Flat`] only asks the operating system which processors are online
//!    (`/sys/devices/system/cpu/online` on Linux), falling back to how many are online if they
//!    cannot be listed. There is no socket/core information and processors are listed in
//!    numeric order.
//!
//! [`TopologyStrategy::Auto`] tries the hierarchical strategy first and falls back to the flat one.
//!
//! ```rust
//! use cpu_topology::{SystemTopology, TopologyStrategy};
//!
//! let topology = SystemTopology::current();
//! let processors = topology.discover(TopologyStrategy::Auto).unwrap();
//!
//! println!("Usable processors: {processors}");
//! ```
//!
//! # Pinning
//!
//! [`SystemTopology::pin_current_thread_to()`] restricts the calling thread to a single
//! processor. The result is reported to the caller, who decides whether a failure matters.
//! On platforms without affinity support, pinning is a successful no-op.
//!
//! # Operating system compatibility
//!
//! The hierarchical strategy, affinity queries and pinning are implemented for Linux. Other
//! operating systems get the flat strategy via `std::thread::available_parallelism()`.

mod enumeration;
mod error;
mod primitive_types;
mod processor;
mod processor_set;
mod system_topology;

pub use enumeration::*;
pub use error::*;
pub use primitive_types::*;
pub use processor::*;
pub use processor_set::*;
pub use system_topology::*;

pub(crate) mod pal;
