//! In-process cache implementation.
//!
//! [`MemoryStore`] implements both [`BoundaryIndex`] and [`RecordStore`].
//! Keys are case-insensitive. A metric's markers live behind a single `Arc`
//! that is swapped under the write lock, so a reader that grabbed the old
//! `Arc` keeps a consistent view while the new set becomes visible to
//! everyone after it.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use vantage_core::boundary::BoundaryMarker;
use vantage_core::types::FieldMap;

use crate::error::StorageError;
use crate::index::BoundaryIndex;
use crate::records::RecordStore;

/// Shared in-memory cache.
///
/// Thread-safe via interior `RwLock`s; designed to be wrapped in `Arc` and
/// shared between the classifier, the ingestor and the aggregator.
pub struct MemoryStore {
    markers: RwLock<HashMap<String, Arc<Vec<BoundaryMarker>>>>,
    /// subject -> metric -> sample record.
    samples: RwLock<HashMap<String, BTreeMap<String, FieldMap>>>,
    metrics: RwLock<HashMap<String, FieldMap>>,
    available: AtomicBool,
}

fn key(name: &str) -> String {
    name.to_lowercase()
}

impl MemoryStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            markers: RwLock::new(HashMap::new()),
            samples: RwLock::new(HashMap::new()),
            metrics: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backing cache going away (or coming back).
    ///
    /// While unavailable every operation fails with
    /// [`StorageError::Unavailable`].
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        if !available {
            tracing::warn!("Memory store marked unavailable");
        }
    }

    fn ensure_available(&self) -> Result<(), StorageError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory store offline".into()))
        }
    }

    /// Snapshot of a metric's markers in index order.
    pub async fn markers(&self, metric: &str) -> Result<Vec<BoundaryMarker>, StorageError> {
        self.ensure_available()?;
        let set = self.markers.read().await.get(&key(metric)).cloned();
        Ok(set.map(|set| set.as_ref().clone()).unwrap_or_default())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoundaryIndex for MemoryStore {
    async fn replace_markers(
        &self,
        metric: &str,
        mut markers: Vec<BoundaryMarker>,
    ) -> Result<(), StorageError> {
        self.ensure_available()?;
        markers.sort_by(|a, b| a.score.total_cmp(&b.score).then_with(|| a.label.cmp(&b.label)));
        let count = markers.len();
        self.markers
            .write()
            .await
            .insert(key(metric), Arc::new(markers));
        tracing::debug!(metric, markers = count, "Replaced boundary markers");
        Ok(())
    }

    async fn first_at_or_above(
        &self,
        metric: &str,
        value: f64,
    ) -> Result<Option<(String, f64)>, StorageError> {
        self.ensure_available()?;
        let Some(set) = self.markers.read().await.get(&key(metric)).cloned() else {
            return Ok(None);
        };
        let at = set.partition_point(|marker| marker.score < value);
        Ok(set
            .get(at)
            .map(|marker| (marker.label.clone(), marker.score)))
    }

    async fn remove_markers(&self, metric: &str) -> Result<(), StorageError> {
        self.ensure_available()?;
        self.markers.write().await.remove(&key(metric));
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn sample_records(&self, subject_path: &str) -> Result<Vec<FieldMap>, StorageError> {
        self.ensure_available()?;
        Ok(self
            .samples
            .read()
            .await
            .get(&key(subject_path))
            .map(|by_metric| by_metric.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn put_sample(
        &self,
        subject_path: &str,
        metric_name: &str,
        fields: FieldMap,
    ) -> Result<(), StorageError> {
        self.ensure_available()?;
        self.samples
            .write()
            .await
            .entry(key(subject_path))
            .or_default()
            .insert(key(metric_name), fields);
        Ok(())
    }

    async fn metric_fields(&self, metric_name: &str) -> Result<Option<FieldMap>, StorageError> {
        self.ensure_available()?;
        Ok(self.metrics.read().await.get(&key(metric_name)).cloned())
    }

    async fn put_metric(&self, metric_name: &str, fields: FieldMap) -> Result<(), StorageError> {
        self.ensure_available()?;
        self.metrics.write().await.insert(key(metric_name), fields);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
