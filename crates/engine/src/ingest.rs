//! Sample ingestion.
//!
//! Readings are classified exactly once, here, and cached with their
//! severity and the metric's tags so hierarchy queries never re-classify or
//! look the metric up again.

use std::sync::Arc;

use chrono::Utc;
use vantage_cache::{BoundaryIndex, RecordStore};
use vantage_core::sample::{metric_tags, Sample};

use crate::classifier::RangeClassifier;
use crate::error::EngineResult;

pub struct SampleIngestor<I: ?Sized, R: ?Sized> {
    classifier: RangeClassifier<I>,
    records: Arc<R>,
}

impl<I, R> SampleIngestor<I, R>
where
    I: BoundaryIndex + ?Sized,
    R: RecordStore + ?Sized,
{
    pub fn new(classifier: RangeClassifier<I>, records: Arc<R>) -> Self {
        Self {
            classifier,
            records,
        }
    }

    /// Classify a reading and cache it under its subject.
    ///
    /// Unparseable readings are stored as `Invalid` and the timeout sentinel
    /// as `Timeout`; only storage failures (or an unreadable metric record)
    /// are errors.
    pub async fn record(
        &self,
        subject_path: &str,
        metric_name: &str,
        raw: Option<&str>,
    ) -> EngineResult<Sample> {
        let status = self.classifier.classify(metric_name, raw).await?;

        let tags = match self.records.metric_fields(metric_name).await? {
            Some(fields) => metric_tags(&fields)?,
            None => Vec::new(),
        };

        let sample = Sample {
            name: Sample::sample_name(subject_path, metric_name),
            metric_name: metric_name.to_string(),
            value: raw.unwrap_or_default().to_string(),
            status,
            metric_tags: tags,
            updated_at: Some(Utc::now()),
        };

        self.records
            .put_sample(subject_path, metric_name, sample.to_fields())
            .await?;

        tracing::debug!(
            sample = %sample.name,
            status = %sample.status,
            "Recorded sample"
        );
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_cache::MemoryStore;
    use vantage_core::ranges::ThresholdDefinition;
    use vantage_core::sample::METRIC_FIELD_TAGS;
    use vantage_core::severity::Severity;
    use vantage_core::types::FieldMap;

    async fn ingestor() -> (Arc<MemoryStore>, SampleIngestor<MemoryStore, MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let classifier = RangeClassifier::new(Arc::clone(&store));
        classifier
            .rebuild(
                "latency",
                &ThresholdDefinition {
                    critical_range: Some([100.0, 1000.0]),
                    ok_range: Some([0.0, 100.0]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let mut metric = FieldMap::new();
        metric.insert(METRIC_FIELD_TAGS.into(), r#"["slo","net"]"#.into());
        store.put_metric("latency", metric).await.unwrap();

        (Arc::clone(&store), SampleIngestor::new(classifier, store))
    }

    #[tokio::test]
    async fn records_classified_sample_with_metric_tags() {
        let (store, ingestor) = ingestor().await;
        let sample = ingestor
            .record("root.web", "latency", Some("250"))
            .await
            .unwrap();
        assert_eq!(sample.name, "root.web|latency");
        assert_eq!(sample.status, Severity::Critical);
        assert_eq!(sample.metric_tags, vec!["slo", "net"]);

        let records = store.sample_records("root.web").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(Sample::from_fields(&records[0]).unwrap(), sample);
    }

    #[tokio::test]
    async fn bad_reading_is_stored_as_invalid() {
        let (_store, ingestor) = ingestor().await;
        let sample = ingestor.record("root.web", "latency", Some("oops")).await.unwrap();
        assert_eq!(sample.status, Severity::Invalid);
        assert_eq!(sample.value, "oops");

        let sample = ingestor.record("root.web", "latency", None).await.unwrap();
        assert_eq!(sample.status, Severity::Invalid);
        assert_eq!(sample.value, "");
    }

    #[tokio::test]
    async fn unknown_metric_has_no_tags() {
        let (_store, ingestor) = ingestor().await;
        let sample = ingestor.record("root.web", "errors", Some("3")).await.unwrap();
        assert!(sample.metric_tags.is_empty());
        assert_eq!(sample.status, Severity::Invalid);
    }
}
