//! Vantage engine services.
//!
//! - [`RangeClassifier`]: rebuilds a metric's canonical range set, publishes
//!   its boundary markers and classifies raw readings against them.
//! - [`SampleIngestor`]: classifies a reading once and caches it as a sample
//!   with the metric's tags copied in.
//! - [`HierarchyAggregator`]: walks a cached subject tree, attaches filtered
//!   samples and prunes everything that neither matches nor leads to a match.

pub mod aggregator;
pub mod classifier;
pub mod error;
pub mod ingest;

pub use aggregator::{HierarchyAggregator, Visit};
pub use classifier::RangeClassifier;
pub use error::{EngineError, EngineResult};
pub use ingest::SampleIngestor;
