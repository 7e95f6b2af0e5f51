use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Errors that can occur when configuring or running an integration benchmark.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The number of workers was zero or negative.
    #[error("worker count must be a positive integer, got {requested}")]
    InvalidWorkerCount {
        /// The worker count that was requested.
        requested: i64,
    },

    /// The integration domain was empty, reversed or not finite.
    #[error(
        "invalid integration domain [{start}, {end}): need finite bounds and width, end > start"
    )]
    InvalidDomain {
        /// The requested start of the domain.
        start: f64,

        /// The requested end of the domain.
        end: f64,
    },

    /// The rectangle width was zero, negative or not finite.
    #[error("step {step} is invalid: it must be finite and positive")]
    InvalidStep {
        /// The requested step.
        step: f64,
    },

    /// An integrand name was not recognized.
    #[error(
        "unknown integrand '{name}', expected one of: oscillating, power-series, constant, identity"
    )]
    UnknownIntegrand {
        /// The name that was not recognized.
        name: String,
    },

    /// None of the discovered processors may be used by the current thread.
    #[error("none of the discovered processors are available to the current thread")]
    NoUsableProcessors,

    /// There is not enough memory to hold the execution slots of the requested size.
    #[error("failed to allocate storage for {slots} execution slots")]
    SlotAllocation {
        /// The number of slots that were requested.
        slots: usize,

        /// The underlying allocation failure.
        #[source]
        source: TryReserveError,
    },

    /// Processor topology discovery failed.
    #[error(transparent)]
    Topology(#[from] cpu_topology::Error),

    /// The operating system refused to start a worker thread.
    #[error("failed to spawn the worker thread for slot {slot_index}")]
    ThreadSpawn {
        /// The slot whose worker could not be started.
        slot_index: usize,

        /// The underlying operating system error.
        #[source]
        source: io::Error,
    },

    /// A worker thread panicked before recording its result.
    #[error("worker for slot {slot_index} panicked: {message}")]
    WorkerPanicked {
        /// The slot whose worker panicked.
        slot_index: usize,

        /// The panic message, if it was a string.
        message: String,
    },

    /// A contributing slot had no result when the partial sums were aggregated.
    #[error("slot {slot_index} has no partial sum to aggregate")]
    MissingPartialSum {
        /// The slot without a result.
        slot_index: usize,
    },
}

/// A specialized `Result` type for integration benchmark operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error was caused by invalid configuration, detected before any work started.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidWorkerCount { .. }
                | Self::InvalidDomain { .. }
                | Self::InvalidStep { .. }
                | Self::UnknownIntegrand { .. }
        )
    }
}
