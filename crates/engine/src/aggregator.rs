//! Hierarchy filter and aggregator.
//!
//! A query hands over a cached subject tree and a [`FilterSpec`]. The tree is
//! walked post-order: every child subtree is evaluated concurrently, then the
//! node attaches its own filtered samples. A node is kept when it matches on
//! its own merit or when any descendant was kept, so every match stays
//! connected to the root.

use std::sync::Arc;

use futures::future::{try_join_all, BoxFuture};
use futures::FutureExt;
use vantage_cache::{RecordStore, StorageError};
use vantage_core::config::EngineConfig;
use vantage_core::filter::{FilterSpec, HierarchyQuery};
use vantage_core::sample::Sample;
use vantage_core::subject::{limit_depth, SubjectNode};

use crate::error::EngineResult;

/// Outcome of evaluating one subtree.
#[derive(Debug, Clone)]
pub struct Visit {
    /// The node with filtered samples and only kept children attached.
    pub node: SubjectNode,
    /// The node passed the filter itself.
    pub matched: bool,
    /// At least one child subtree was kept.
    pub has_kept_descendant: bool,
}

impl Visit {
    pub fn keep(&self) -> bool {
        self.matched || self.has_kept_descendant
    }
}

pub struct HierarchyAggregator<R: ?Sized> {
    records: Arc<R>,
    config: EngineConfig,
}

impl<R: RecordStore + ?Sized> HierarchyAggregator<R> {
    pub fn new(records: Arc<R>, config: EngineConfig) -> Self {
        Self { records, config }
    }

    /// Filter and prune `root`, then apply the depth limit.
    ///
    /// Returns `None` when nothing in the tree matches. A storage failure
    /// anywhere aborts the whole call; partial trees are never returned.
    pub async fn materialize(
        &self,
        root: SubjectNode,
        spec: &FilterSpec,
        depth: Option<usize>,
    ) -> EngineResult<Option<SubjectNode>> {
        let root_path = root.absolute_path.clone();
        let total = root.node_count();

        let visit = self.traverse(root, spec).await.inspect_err(|e| {
            tracing::error!(root = %root_path, error = %e, "Hierarchy materialization aborted")
        })?;

        if !visit.keep() {
            tracing::debug!(root = %root_path, total, "No subject matched the filter");
            return Ok(None);
        }

        let mut tree = visit.node;
        if let Some(depth) = self.config.effective_depth(depth) {
            limit_depth(&mut tree, depth);
        }

        tracing::debug!(
            root = %root_path,
            total,
            kept = tree.node_count(),
            "Materialized hierarchy"
        );
        Ok(Some(tree))
    }

    /// Validate raw query parameters, then [`materialize`](Self::materialize).
    pub async fn query(
        &self,
        root: SubjectNode,
        query: &HierarchyQuery,
    ) -> EngineResult<Option<SubjectNode>> {
        let spec = query.to_filter_spec()?;
        self.materialize(root, &spec, query.depth).await
    }

    /// Post-order walk with concurrent fan-out over children.
    ///
    /// Children are evaluated independently and only kept ones are
    /// reattached, in their original order.
    pub fn traverse<'a>(
        &'a self,
        mut node: SubjectNode,
        spec: &'a FilterSpec,
    ) -> BoxFuture<'a, Result<Visit, StorageError>> {
        async move {
            let children = std::mem::take(&mut node.children);
            let visits =
                try_join_all(children.into_iter().map(|child| self.traverse(child, spec))).await?;

            let kept: Vec<SubjectNode> = visits
                .into_iter()
                .filter(Visit::keep)
                .map(|visit| visit.node)
                .collect();

            let (mut node, matched) = self.attach_and_filter_samples(node, spec).await?;
            node.children = kept;

            Ok(Visit {
                has_kept_descendant: !node.children.is_empty(),
                matched,
                node,
            })
        }
        .boxed()
    }

    /// Attach the node's surviving samples and decide whether it matches on
    /// its own merit.
    ///
    /// A node failing the entity-tag dimension never matches and its samples
    /// are not fetched. Otherwise each cached sample must pass the metric
    /// name, metric tag and severity dimensions; the node matches when no
    /// such dimension is set or at least one sample survived.
    pub async fn attach_and_filter_samples(
        &self,
        mut node: SubjectNode,
        spec: &FilterSpec,
    ) -> Result<(SubjectNode, bool), StorageError> {
        node.samples.clear();
        if !spec.entity_passes(node.tag_refs()) {
            return Ok((node, false));
        }

        let records = self.records.sample_records(&node.absolute_path).await?;
        node.samples = records
            .iter()
            .filter_map(|fields| match Sample::from_fields(fields) {
                Ok(sample) => Some(sample),
                Err(e) => {
                    tracing::warn!(
                        subject = %node.absolute_path,
                        error = %e,
                        "Skipping unreadable cached sample"
                    );
                    None
                }
            })
            .filter(|sample| spec.sample_passes(sample))
            .collect();

        let matched = !spec.filters_samples() || !node.samples.is_empty();
        Ok((node, matched))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
