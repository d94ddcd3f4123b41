//! Overtime submission, approval and monthly recap.
//!
//! - Entry validation against policy and existing claims
//! - Request lifecycle (submit, decide, resubmit)
//! - Recap period arithmetic
//! - Paid / TOIL / carryover split and payment derivation

pub mod error;
pub mod period;
pub mod recap;
pub mod types;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod recap_props;
#[cfg(test)]
mod validation_props;

pub use error::OvertimeError;
pub use period::RecapPeriod;
pub use recap::{RecapCalculator, RecapResult};
pub use types::{
    ApprovalDecision, ApprovalStep, OvertimeBalance, OvertimeEntry, OvertimeRecap,
    OvertimeRequest, OvertimeStatus,
};
pub use validation::{
    EntryField, FieldError, FieldWarning, ValidationContext, ValidationIssue, ValidationResult,
    min_entry_date, validate_entries,
};
pub use workflow::OvertimeWorkflow;
