//! Error types for the join engine.
//!
//! Every failure is surfaced synchronously to the caller before or
//! instead of producing output; there are no retries and no partial
//! results.

use thiserror::Error;

/// Errors produced by [`join_top_n`](crate::join_top_n) and the
/// configuration parsing helpers.
#[derive(Debug, Error)]
pub enum JoinError {
    /// The configuration is rejected before any work begins:
    /// `top_n < 1`, `threads == Some(0)`, or an unsupported textual
    /// normalization / threading-dimension value.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The worker thread pool could not be created. Fatal for the
    /// whole call.
    #[error("failed to create worker thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, JoinError>;
