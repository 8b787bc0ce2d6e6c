#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Barrier;
use tracing_subscriber::EnvFilter;
use vantage_cache::{MemoryStore, RecordStore, StorageError};
use vantage_core::ranges::ThresholdDefinition;
use vantage_core::sample::Sample;
use vantage_core::severity::Severity;
use vantage_core::subject::SubjectNode;
use vantage_core::types::FieldMap;
use vantage_engine::RangeClassifier;

/// Install a test subscriber once; honours `RUST_LOG`, defaults to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Build a definition from optional `[min, max]` pairs, highest precedence first.
pub fn definition(
    critical: Option<[f64; 2]>,
    warning: Option<[f64; 2]>,
    info: Option<[f64; 2]>,
    ok: Option<[f64; 2]>,
) -> ThresholdDefinition {
    ThresholdDefinition {
        critical_range: critical,
        warning_range: warning,
        info_range: info,
        ok_range: ok,
    }
}

/// A fresh store and a classifier writing to it.
pub fn classifier() -> (Arc<MemoryStore>, RangeClassifier<MemoryStore>) {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    (Arc::clone(&store), RangeClassifier::new(store))
}

/// Cache an already-classified sample for `subject`.
pub async fn put_sample<R: RecordStore + ?Sized>(
    store: &R,
    subject: &str,
    metric: &str,
    status: Severity,
    metric_tags: &[&str],
) {
    let sample = Sample {
        name: Sample::sample_name(subject, metric),
        metric_name: metric.to_string(),
        value: "1".into(),
        status,
        metric_tags: metric_tags.iter().map(|t| t.to_string()).collect(),
        updated_at: None,
    };
    store
        .put_sample(subject, metric, sample.to_fields())
        .await
        .expect("sample should be stored");
}

/// Every absolute path in a tree, pre-order.
pub fn paths(node: &SubjectNode) -> Vec<String> {
    let mut out = vec![node.absolute_path.clone()];
    for child in &node.children {
        out.extend(paths(child));
    }
    out
}

// ---------------------------------------------------------------------------
// FlakyRecords
// ---------------------------------------------------------------------------

/// Record store that fails whenever one particular subject is read.
pub struct FlakyRecords {
    pub inner: MemoryStore,
    failing_subject: String,
    pub reads: AtomicUsize,
}

impl FlakyRecords {
    pub fn failing_on(subject: &str) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing_subject: subject.to_string(),
            reads: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RecordStore for FlakyRecords {
    async fn sample_records(&self, subject_path: &str) -> Result<Vec<FieldMap>, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if subject_path == self.failing_subject {
            return Err(StorageError::Unavailable(format!(
                "connection reset reading {subject_path}"
            )));
        }
        self.inner.sample_records(subject_path).await
    }

    async fn put_sample(
        &self,
        subject_path: &str,
        metric_name: &str,
        fields: FieldMap,
    ) -> Result<(), StorageError> {
        self.inner.put_sample(subject_path, metric_name, fields).await
    }

    async fn metric_fields(&self, metric_name: &str) -> Result<Option<FieldMap>, StorageError> {
        self.inner.metric_fields(metric_name).await
    }

    async fn put_metric(&self, metric_name: &str, fields: FieldMap) -> Result<(), StorageError> {
        self.inner.put_metric(metric_name, fields).await
    }
}

// ---------------------------------------------------------------------------
// GatedRecords
// ---------------------------------------------------------------------------

/// Record store whose reads for a set of subjects block until all of them
/// are being read at once.
pub struct GatedRecords {
    pub inner: MemoryStore,
    gated: Vec<String>,
    barrier: Barrier,
}

impl GatedRecords {
    pub fn gating<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let gated: Vec<String> = subjects.into_iter().map(Into::into).collect();
        Self {
            inner: MemoryStore::new(),
            barrier: Barrier::new(gated.len()),
            gated,
        }
    }
}

#[async_trait]
impl RecordStore for GatedRecords {
    async fn sample_records(&self, subject_path: &str) -> Result<Vec<FieldMap>, StorageError> {
        if self.gated.iter().any(|gated| gated == subject_path) {
            self.barrier.wait().await;
        }
        self.inner.sample_records(subject_path).await
    }

    async fn put_sample(
        &self,
        subject_path: &str,
        metric_name: &str,
        fields: FieldMap,
    ) -> Result<(), StorageError> {
        self.inner.put_sample(subject_path, metric_name, fields).await
    }

    async fn metric_fields(&self, metric_name: &str) -> Result<Option<FieldMap>, StorageError> {
        self.inner.metric_fields(metric_name).await
    }

    async fn put_metric(&self, metric_name: &str, fields: FieldMap) -> Result<(), StorageError> {
        self.inner.put_metric(metric_name, fields).await
    }
}
