//! Core accrual and reconciliation logic.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the [`store::AccrualStore`] port.
//!
//! # Modules
//!
//! - `policy` - Injected clock and policy constants
//! - `overtime` - Entry validation, request lifecycle, monthly recap
//! - `leave` - Leave state machine, balance ledger, timeline
//! - `bulk` - Bounded, failure-isolating bulk recap runner
//! - `store` - Persistence port consumed by the engine
//! - `service` - Engine entry points combining the above

pub mod bulk;
pub mod error;
pub mod leave;
pub mod overtime;
pub mod policy;
pub mod service;
pub mod store;

pub use error::ErrorCategory;
pub use service::{AccrualService, CommittedLeaveTransition};
