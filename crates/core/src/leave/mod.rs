//! Leave requests and balances.
//!
//! - Leave types, statuses and request records
//! - Working-day counting
//! - Per-year balance ledger with annual and TOIL buckets
//! - State machine tying transitions to balance mutations
//! - Timeline derived from request timestamps

pub mod days;
pub mod error;
pub mod ledger;
pub mod timeline;
pub mod types;
pub mod workflow;

#[cfg(test)]
mod ledger_props;

pub use days::{leave_span, working_days};
pub use error::LeaveError;
pub use ledger::{BalanceMutation, LeaveBalance};
pub use timeline::{LeaveEvent, LeaveEventKind, leave_timeline};
pub use types::{
    LeaveAction, LeaveBucket, LeaveCommitments, LeaveRequest, LeaveStatus, LeaveType,
    NewLeaveRequest,
};
pub use workflow::{LeaveContext, LeaveTransition, LeaveWorkflow};
