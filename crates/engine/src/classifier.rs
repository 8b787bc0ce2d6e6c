//! Range classifier service.
//!
//! Owns the write path (threshold definition -> canonical ranges -> boundary
//! markers) and the read path (raw reading -> severity) for the per-metric
//! boundary index.

use std::sync::Arc;

use vantage_cache::{BoundaryIndex, StorageError};
use vantage_core::boundary::{markers_for, resolve};
use vantage_core::ranges::{build_ranges, merge_overlaps, Range, ThresholdDefinition};
use vantage_core::reading::prepare_value;
use vantage_core::severity::Severity;

use crate::error::EngineResult;

/// Classifies readings against each metric's canonical range set.
///
/// Cheap to clone; clones share the same index.
pub struct RangeClassifier<I: ?Sized> {
    index: Arc<I>,
}

impl<I: ?Sized> Clone for RangeClassifier<I> {
    fn clone(&self) -> Self {
        Self {
            index: Arc::clone(&self.index),
        }
    }
}

impl<I: BoundaryIndex + ?Sized> RangeClassifier<I> {
    pub fn new(index: Arc<I>) -> Self {
        Self { index }
    }

    /// Rebuild a metric's index from its threshold definition.
    ///
    /// Full rebuild every time: validate and sort, merge into the canonical
    /// set, then publish. A malformed definition is rejected before anything
    /// is written, leaving the previous index in place.
    pub async fn rebuild(
        &self,
        metric: &str,
        definition: &ThresholdDefinition,
    ) -> EngineResult<Vec<Range>> {
        let sorted = build_ranges(definition)?;
        let canonical = merge_overlaps(&sorted);
        self.publish_range_set(metric, &canonical).await?;
        tracing::info!(
            metric,
            raw_ranges = sorted.len(),
            canonical_ranges = canonical.len(),
            "Rebuilt metric range set"
        );
        Ok(canonical)
    }

    /// Write two boundary markers per canonical range as one batch.
    pub async fn publish_range_set(
        &self,
        metric: &str,
        canonical: &[Range],
    ) -> Result<(), StorageError> {
        self.index
            .replace_markers(metric, markers_for(canonical))
            .await
    }

    /// Drop a metric's index (the metric was removed upstream).
    pub async fn clear(&self, metric: &str) -> Result<(), StorageError> {
        self.index.remove_markers(metric).await
    }

    /// Classify a raw reading.
    ///
    /// Bad input never fails: unparseable readings are `Invalid` and the
    /// timeout sentinel is `Timeout`, both without touching the index. Only
    /// an unreachable index is an error.
    pub async fn classify(&self, metric: &str, raw: Option<&str>) -> Result<Severity, StorageError> {
        let value = match prepare_value(raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(metric, error = %e, "Reading not classifiable");
                return Ok(e.severity());
            }
        };

        let marker = self
            .index
            .first_at_or_above(metric, value)
            .await
            .inspect_err(|e| tracing::error!(metric, error = %e, "Boundary index lookup failed"))?;

        Ok(resolve(
            marker.as_ref().map(|(label, score)| (label.as_str(), *score)),
            value,
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use vantage_cache::MemoryStore;
    use vantage_core::error::CoreError;

    use crate::error::EngineError;

    fn classifier() -> (Arc<MemoryStore>, RangeClassifier<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Arc::clone(&store), RangeClassifier::new(store))
    }

    #[tokio::test]
    async fn publish_writes_two_markers_per_range() {
        let (store, classifier) = classifier();
        let definition = ThresholdDefinition {
            critical_range: Some([2.0, 3.0]),
            info_range: Some([0.0, 10.0]),
            ..Default::default()
        };
        let canonical = classifier.rebuild("disk", &definition).await.unwrap();
        assert_eq!(canonical.len(), 3);
        assert_eq!(store.markers("disk").await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn malformed_definition_keeps_previous_index() {
        let (store, classifier) = classifier();
        let good = ThresholdDefinition {
            ok_range: Some([0.0, 1.0]),
            ..Default::default()
        };
        classifier.rebuild("cpu", &good).await.unwrap();

        let bad = ThresholdDefinition {
            ok_range: Some([1.0, 0.0]),
            ..Default::default()
        };
        let result = classifier.rebuild("cpu", &bad).await;
        assert_matches!(
            result,
            Err(EngineError::Core(CoreError::MalformedThreshold { .. }))
        );
        assert_eq!(store.markers("cpu").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn sentinels_skip_the_index() {
        let (store, classifier) = classifier();
        store.set_available(false);
        assert_eq!(
            classifier.classify("cpu", Some("Timeout")).await,
            Ok(Severity::Timeout)
        );
        assert_eq!(classifier.classify("cpu", None).await, Ok(Severity::Invalid));
        assert_eq!(
            classifier.classify("cpu", Some("n/a")).await,
            Ok(Severity::Invalid)
        );
    }

    #[tokio::test]
    async fn unreachable_index_is_an_error() {
        let (store, classifier) = classifier();
        store.set_available(false);
        assert_matches!(
            classifier.classify("cpu", Some("1")).await,
            Err(StorageError::Unavailable(_))
        );
    }

    #[tokio::test]
    async fn cleared_metric_classifies_invalid() {
        let (_store, classifier) = classifier();
        let definition = ThresholdDefinition {
            ok_range: Some([0.0, 100.0]),
            ..Default::default()
        };
        classifier.rebuild("cpu", &definition).await.unwrap();
        assert_eq!(classifier.classify("cpu", Some("50")).await, Ok(Severity::Ok));

        classifier.clear("cpu").await.unwrap();
        assert_eq!(
            classifier.classify("cpu", Some("50")).await,
            Ok(Severity::Invalid)
        );
    }
}
