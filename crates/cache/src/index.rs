use async_trait::async_trait;
use vantage_core::boundary::BoundaryMarker;

use crate::error::StorageError;

/// Per-metric sorted boundary index.
///
/// Entries for one metric are ordered by score, then by label. Writers
/// replace a metric's entries as a single unit: readers see either the old
/// set or the new one, never a mix.
#[async_trait]
pub trait BoundaryIndex: Send + Sync {
    /// Replace every marker for `metric` in one step.
    async fn replace_markers(
        &self,
        metric: &str,
        markers: Vec<BoundaryMarker>,
    ) -> Result<(), StorageError>;

    /// The smallest-scored marker with `score >= value`, as `(label, score)`.
    async fn first_at_or_above(
        &self,
        metric: &str,
        value: f64,
    ) -> Result<Option<(String, f64)>, StorageError>;

    /// Drop the metric's index entirely.
    async fn remove_markers(&self, metric: &str) -> Result<(), StorageError>;
}
