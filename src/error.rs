//! Error types for the benchmark harness

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the benchmark harness
///
/// All of these are fatal: they are reported before any worker starts and
/// the process exits with code 1. There are no recoverable runtime errors
/// in steady-state operation.
#[derive(Error, Debug)]
pub enum Error {
    /// A numeric argument failed post-parse validation
    #[error("invalid {name}: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },

    /// Unrecognized cache-type token
    #[error("unknown cache type: {0} (expected 'lru' or 'scalable')")]
    UnknownCacheType(String),

    /// Worker thread could not be spawned
    #[error("failed to spawn worker thread: {0}")]
    Io(#[from] std::io::Error),
}
