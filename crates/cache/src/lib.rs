//! Cache collaborators for the derived view.
//!
//! This crate defines the two storage contracts the engine relies on and an
//! in-process implementation of both:
//!
//! - [`BoundaryIndex`]: per-metric sorted boundary markers, replaced one
//!   metric at a time and queried for the first marker at or above a value.
//! - [`RecordStore`]: flat field/value records for cached samples (keyed by
//!   subject) and metrics (keyed by metric name).
//! - [`MemoryStore`]: `tokio::sync::RwLock`-backed implementation of both,
//!   designed to be shared via `Arc`.

pub mod error;
pub mod index;
pub mod memory;
pub mod records;

pub use error::StorageError;
pub use index::BoundaryIndex;
pub use memory::MemoryStore;
pub use records::RecordStore;
