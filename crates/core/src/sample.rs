//! Classified samples and their cached record form.
//!
//! A sample is classified once at ingestion and cached as a flat field/value
//! record under its subject. The metric's tags are copied into the record so
//! the hierarchy filter never needs a second lookup.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::severity::Severity;
use crate::types::{FieldMap, Timestamp};

pub const FIELD_NAME: &str = "name";
pub const FIELD_METRIC: &str = "metric";
pub const FIELD_VALUE: &str = "value";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_METRIC_TAGS: &str = "metricTags";
pub const FIELD_UPDATED_AT: &str = "updatedAt";

/// Field of a cached metric record holding its tags as a JSON array.
pub const METRIC_FIELD_TAGS: &str = "tags";

/// Separator between subject path and metric name in a sample name.
pub const NAME_SEPARATOR: char = '|';

/// Tags of a cached metric record; a missing field means no tags.
pub fn metric_tags(fields: &FieldMap) -> Result<Vec<String>, CoreError> {
    match fields.get(METRIC_FIELD_TAGS) {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| CoreError::InvalidRecord(format!("metric record has bad tags: {e}"))),
        None => Ok(Vec::new()),
    }
}

/// A single classified reading of one metric on one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// `"{subject_path}|{metric_name}"`.
    pub name: String,
    pub metric_name: String,
    /// The reading exactly as reported.
    pub value: String,
    pub status: Severity,
    #[serde(default)]
    pub metric_tags: Vec<String>,
    pub updated_at: Option<Timestamp>,
}

impl Sample {
    pub fn sample_name(subject_path: &str, metric_name: &str) -> String {
        format!("{subject_path}{NAME_SEPARATOR}{metric_name}")
    }

    /// Flatten into the cached record form.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert(FIELD_NAME.into(), self.name.clone());
        fields.insert(FIELD_METRIC.into(), self.metric_name.clone());
        fields.insert(FIELD_VALUE.into(), self.value.clone());
        fields.insert(FIELD_STATUS.into(), self.status.to_string());
        fields.insert(
            FIELD_METRIC_TAGS.into(),
            serde_json::Value::from(self.metric_tags.clone()).to_string(),
        );
        if let Some(updated_at) = self.updated_at {
            fields.insert(FIELD_UPDATED_AT.into(), updated_at.to_rfc3339());
        }
        fields
    }

    /// Rebuild a sample from its cached record form.
    ///
    /// `metric` falls back to the part of `name` after the separator, and a
    /// missing `metricTags` field means no tags.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, CoreError> {
        let required = |key: &str| {
            fields
                .get(key)
                .cloned()
                .ok_or_else(|| CoreError::InvalidRecord(format!("sample record missing '{key}'")))
        };

        let name = required(FIELD_NAME)?;
        let metric_name = match fields.get(FIELD_METRIC) {
            Some(metric) => metric.clone(),
            None => name
                .rsplit_once(NAME_SEPARATOR)
                .map(|(_, metric)| metric.to_string())
                .ok_or_else(|| {
                    CoreError::InvalidRecord(format!("sample name '{name}' has no metric part"))
                })?,
        };
        let value = fields.get(FIELD_VALUE).cloned().unwrap_or_default();
        let status = required(FIELD_STATUS)?
            .parse()
            .map_err(|e: CoreError| CoreError::InvalidRecord(e.to_string()))?;

        let metric_tags = match fields.get(FIELD_METRIC_TAGS) {
            Some(raw) => serde_json::from_str(raw).map_err(|e| {
                CoreError::InvalidRecord(format!("sample '{name}' has bad metricTags: {e}"))
            })?,
            None => Vec::new(),
        };

        let updated_at = fields
            .get(FIELD_UPDATED_AT)
            .map(|raw| {
                chrono::DateTime::parse_from_rfc3339(raw)
                    .map(|ts| ts.with_timezone(&chrono::Utc))
                    .map_err(|e| {
                        CoreError::InvalidRecord(format!("sample '{name}' has bad updatedAt: {e}"))
                    })
            })
            .transpose()?;

        Ok(Self {
            name,
            metric_name,
            value,
            status,
            metric_tags,
            updated_at,
        })
    }
}
