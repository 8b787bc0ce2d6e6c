use async_trait::async_trait;
use vantage_core::types::FieldMap;

use crate::error::StorageError;

/// Flat field/value records for cached samples and metrics.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every cached sample record for a subject, in metric-name order.
    async fn sample_records(&self, subject_path: &str) -> Result<Vec<FieldMap>, StorageError>;

    /// Create or overwrite the sample record for `(subject, metric)`.
    async fn put_sample(
        &self,
        subject_path: &str,
        metric_name: &str,
        fields: FieldMap,
    ) -> Result<(), StorageError>;

    /// The cached record for a metric, if any.
    async fn metric_fields(&self, metric_name: &str) -> Result<Option<FieldMap>, StorageError>;

    /// Create or overwrite a metric record.
    async fn put_metric(&self, metric_name: &str, fields: FieldMap) -> Result<(), StorageError>;
}
