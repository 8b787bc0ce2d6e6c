/// Failure talking to the cache backing the derived view.
///
/// Always fatal for the call in flight: a classification or hierarchy query
/// never returns a partial result after a storage error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}
