//! Vantage core domain logic.
//!
//! Everything in this crate is pure: no storage access, no async. The cache
//! and engine crates build on these types.
//!
//! - [`ranges`]: threshold ranges and the canonical merge.
//! - [`boundary`]: boundary markers written to the per-metric index.
//! - [`reading`]: raw reading preparation.
//! - [`filter`]: hierarchy query filters.
//! - [`subject`] / [`sample`]: the cached subject tree and its samples.

pub mod boundary;
pub mod config;
pub mod error;
pub mod filter;
pub mod ranges;
pub mod reading;
pub mod sample;
pub mod severity;
pub mod subject;
pub mod types;
