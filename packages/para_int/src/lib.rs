#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A parallel numerical integration micro-benchmark.
//!
//! A fixed domain is split into contiguous intervals, one per requested worker. Each interval is
//! integrated with a fixed-step left rectangle rule on its own OS thread, pinned to a processor
//! chosen from the discovered topology, and the partial sums are added up once every thread has
//! been joined.
//!
//! The interesting part is how work is mapped onto hardware:
//!
//! * There are always at least as many execution slots as processors. If fewer workers are
//!   requested than there are processors, extra saturation slots keep the remaining processors
//!   busy with mirrored work so that affinity effects stay observable. Their results are never
//!   added to the total.
//! * Slots are assigned to processors round-robin, in the core-spreading order produced by
//!   [`cpu_topology`], so the first slots land on distinct physical cores.
//! * Every slot has its own cache line. Workers write only their own slot and the aggregator only
//!   reads after joining, so the compute phase needs no locks or atomics.
//!
//! # Example
//!
//! ```
//! use cpu_topology::SystemTopology;
//! use para_int::{Domain, Integrand, RunConfig, Step, run};
//!
//! let config = RunConfig::new(4)
//!     .unwrap()
//!     .with_domain(Domain::new(0.0, 1.0).unwrap())
//!     .with_step(Step::new(1e-4).unwrap())
//!     .with_integrand(Integrand::Identity);
//!
//! let report = run(&config, &SystemTopology::current()).unwrap();
//!
//! assert!((report.total() - 0.5).abs() < 1e-3);
//! ```

mod aggregate;
mod config;
mod domain;
mod error;
mod integrand;
mod planner;
mod quadrature;
mod run;
mod slot;
mod worker;

pub use aggregate::*;
pub use config::*;
pub use domain::*;
pub use error::*;
pub use integrand::*;
pub use planner::*;
pub use quadrature::*;
pub use run::*;
pub use slot::*;
pub use worker::*;
