use std::io;

use thiserror::Error;

use crate::ProcessorId;

/// Errors that can occur when discovering the processor topology or applying processor affinity.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The operating system could not tell us which processors are available.
    #[error("processor topology is unavailable: {context}")]
    TopologyUnavailable {
        /// What we were trying to find out when the query failed.
        context: String,

        /// The underlying operating system error.
        #[source]
        source: io::Error,
    },

    /// The hierarchical socket/core/processor enumeration or the online processor list did not
    /// match the expected format.
    #[error("malformed topology enumeration at line {line}: {problem}")]
    MalformedEnumeration {
        /// 1-based line number in the enumeration text, counting header lines.
        line: usize,

        /// A human-readable description of the problem.
        problem: String,
    },

    /// The hierarchical enumeration was well-formed but did not list any processors.
    #[error("topology enumeration did not list any processors")]
    EmptyEnumeration,

    /// The current thread could not be pinned to the requested processor.
    #[error("failed to pin the current thread to processor {processor_id}")]
    PinningFailed {
        /// The processor the thread was supposed to be pinned to.
        processor_id: ProcessorId,

        /// The underlying operating system error.
        #[source]
        source: io::Error,
    },

    /// A topology strategy name was not recognized.
    #[error("unknown topology strategy '{name}', expected one of: auto, hierarchical, flat")]
    UnknownStrategy {
        /// The name that was not recognized.
        name: String,
    },
}

impl Error {
    pub(crate) fn unavailable(context: impl Into<String>, source: io::Error) -> Self {
        Self::TopologyUnavailable {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn malformed(line: usize, problem: impl Into<String>) -> Self {
        Self::MalformedEnumeration {
            line,
            problem: problem.into(),
        }
    }
}

/// A specialized `Result` type for topology operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
