//! Error types for the clustering engine.
//!
//! The taxonomy is deliberately small: configuration problems are caught
//! before any work starts, allocation failure is the only resource error,
//! and the clustering itself cannot fail mid-simulation (it is deterministic
//! given its RNG streams). I/O lives in the driver crate and carries its own
//! error context there.

use std::fmt;

/// Errors surfaced by `perc-core`.
#[derive(Debug, Clone)]
pub enum Error {
    /// A parameter failed validation; reported before any work is done.
    Config(String),

    /// The forest allocation was refused by the allocator.
    Allocation {
        /// Bytes the forest would have needed.
        requested_bytes: usize,
    },

    /// The worker thread pool could not be constructed.
    Parallelism(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "invalid configuration: {}", msg),
            Error::Allocation { requested_bytes } => {
                write!(
                    f,
                    "failed to allocate forest storage ({} bytes requested)",
                    requested_bytes
                )
            }
            Error::Parallelism(msg) => write!(f, "thread pool setup failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
