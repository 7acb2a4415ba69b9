//! Error types.
//!
//! The scheduler API itself reports rejected calls through boolean return
//! values. The typed conversions underneath it (strategy names, tier names,
//! thread priorities) produce an [`Error`] describing why a value was refused.

use thiserror::Error;

/// Errors produced when converting user input into scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The name does not match any execution strategy.
    #[error("unknown execution strategy: {0:?}")]
    UnknownStrategy(String),

    /// The name does not match any priority tier.
    #[error("unknown priority tier: {0:?}")]
    UnknownTier(String),

    /// The value is not an integer in `1..=10`.
    #[error("invalid thread priority: {0:?} (expected an integer in 1..=10)")]
    InvalidPriority(String),
}

/// Convenience alias for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
