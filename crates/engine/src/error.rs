use vantage_cache::StorageError;
use vantage_core::error::CoreError;

/// Error type for engine operations.
///
/// Wraps [`CoreError`] for rejected input (malformed thresholds, invalid
/// query filters, unreadable cached records) and [`StorageError`] for the
/// cache going away mid-call.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A domain-level error from `vantage_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The cache could not be reached; the call was aborted.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Convenience type alias for engine return values.
pub type EngineResult<T> = Result<T, EngineError>;
