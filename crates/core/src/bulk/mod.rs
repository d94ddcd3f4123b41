//! Bulk recap orchestration.
//!
//! Fans a period's recap out over many employees on a bounded worker pool
//! and aggregates per-employee outcomes.

pub mod runner;
pub mod types;

pub use runner::BulkRecapRunner;
pub use types::{BulkFailure, BulkOutcome};
