//! Leave domain types.

use std::fmt;

use accrual_shared::types::{EmployeeId, LeaveRequestId};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of leave being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    /// Paid annual leave, debited from the annual quota.
    #[serde(rename = "ANNUAL_LEAVE")]
    Annual,
    /// Time off in lieu, debited from TOIL days earned through recaps.
    #[serde(rename = "TOIL")]
    Toil,
    /// Sick leave; no quota.
    #[serde(rename = "SICK_LEAVE")]
    Sick,
    /// Unpaid leave; capped per year and per request.
    #[serde(rename = "UNPAID_LEAVE")]
    Unpaid,
    /// Marriage leave; fixed length.
    #[serde(rename = "MARRIAGE_LEAVE")]
    Marriage,
    /// Maternity leave; fixed length.
    #[serde(rename = "MATERNITY_LEAVE")]
    Maternity,
}

impl LeaveType {
    /// Returns the string representation of the leave type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Annual => "ANNUAL_LEAVE",
            Self::Toil => "TOIL",
            Self::Sick => "SICK_LEAVE",
            Self::Unpaid => "UNPAID_LEAVE",
            Self::Marriage => "MARRIAGE_LEAVE",
            Self::Maternity => "MATERNITY_LEAVE",
        }
    }

    /// Length of fixed-duration types, in calendar days.
    #[must_use]
    pub const fn fixed_days(&self) -> Option<i32> {
        match self {
            Self::Marriage => Some(3),
            Self::Maternity => Some(90),
            _ => None,
        }
    }

    /// Balance bucket debited on approval, if any.
    #[must_use]
    pub const fn bucket(&self) -> Option<LeaveBucket> {
        match self {
            Self::Annual => Some(LeaveBucket::Annual),
            Self::Toil => Some(LeaveBucket::Toil),
            _ => None,
        }
    }

    /// Sick leave is usually filed after the fact.
    #[must_use]
    pub const fn allows_backdating(&self) -> bool {
        matches!(self, Self::Sick)
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quota-bearing part of a [`LeaveBalance`](super::LeaveBalance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveBucket {
    /// Annual quota.
    Annual,
    /// TOIL days earned through recaps.
    Toil,
}

/// Leave request status.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Approved → Cancelled (cancel, before the start date)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    /// Waiting for a decision; days are held, not debited.
    Pending,
    /// Accepted; days debited.
    Approved,
    /// Declined (terminal).
    Rejected,
    /// Withdrawn after approval (terminal); days credited back.
    Cancelled,
}

impl LeaveStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// No transition leaves a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Cancelled)
    }

    /// Requests in these states count against balances and caps.
    #[must_use]
    pub const fn holds_days(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action applied to a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveAction {
    /// Approve a pending request.
    Approve,
    /// Reject a pending request (reason required).
    Reject,
    /// Cancel an approved request (owner only).
    Cancel,
}

impl LeaveAction {
    /// Status reached when the action succeeds.
    #[must_use]
    pub const fn target_status(self) -> LeaveStatus {
        match self {
            Self::Approve => LeaveStatus::Approved,
            Self::Reject => LeaveStatus::Rejected,
            Self::Cancel => LeaveStatus::Cancelled,
        }
    }
}

/// Input for a new leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLeaveRequest {
    /// Leave type.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave. Ignored for fixed-duration types.
    pub end_date: NaiveDate,
    /// Free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// A leave request and its lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: LeaveRequestId,
    /// Owner.
    pub employee_id: EmployeeId,
    /// Leave type.
    pub leave_type: LeaveType,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave.
    pub end_date: NaiveDate,
    /// Working days (or the fixed length) covered.
    pub total_days: i32,
    /// Free-text reason given by the employee.
    pub reason: Option<String>,
    /// Current status.
    pub status: LeaveStatus,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Approval time.
    pub approved_at: Option<DateTime<Utc>>,
    /// Approver.
    pub approved_by: Option<EmployeeId>,
    /// Rejection time.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Who rejected.
    pub rejected_by: Option<EmployeeId>,
    /// Why it was rejected.
    pub rejection_reason: Option<String>,
    /// Cancellation time.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Why it was cancelled.
    pub cancellation_reason: Option<String>,
}

impl LeaveRequest {
    /// Balance year the request counts against.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.start_date.year()
    }
}

/// Days held by an employee's other requests in one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveCommitments {
    /// Days of PENDING annual leave.
    pub pending_annual: i32,
    /// Days of PENDING TOIL leave.
    pub pending_toil: i32,
    /// Days of PENDING or APPROVED unpaid leave.
    pub unpaid_days: i32,
}

impl LeaveCommitments {
    /// Pending days held against `bucket`.
    #[must_use]
    pub const fn pending_in(&self, bucket: LeaveBucket) -> i32 {
        match bucket {
            LeaveBucket::Annual => self.pending_annual,
            LeaveBucket::Toil => self.pending_toil,
        }
    }

    /// Adds `request` to the totals if it holds days.
    pub fn record(&mut self, request: &LeaveRequest) {
        match (request.leave_type, request.status) {
            (LeaveType::Annual, LeaveStatus::Pending) => self.pending_annual += request.total_days,
            (LeaveType::Toil, LeaveStatus::Pending) => self.pending_toil += request.total_days,
            (LeaveType::Unpaid, status) if status.holds_days() => {
                self.unpaid_days += request.total_days;
            }
            _ => {}
        }
    }
}
