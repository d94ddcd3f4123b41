//! Overtime domain types.

use std::collections::BTreeSet;
use std::fmt;

use accrual_shared::types::{EmployeeId, Hours, OvertimeRecapId, OvertimeRequestId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::RecapPeriod;
use super::recap::RecapResult;

/// One day of overtime inside a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeEntry {
    /// Day the overtime was worked.
    pub date: NaiveDate,
    /// Hours worked (0.5-12, half-hour steps).
    pub hours: Hours,
    /// What the overtime was for.
    pub description: String,
}

/// Overtime request status in the approval workflow.
///
/// The valid transitions are:
/// - Pending → Approved (approve)
/// - Pending → Rejected (reject)
/// - Pending → RevisionRequested (request revision)
/// - RevisionRequested → Pending (resubmit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OvertimeStatus {
    /// Waiting for a decision.
    Pending,
    /// Sent back to the employee for changes.
    RevisionRequested,
    /// Accepted; hours count toward the next recap.
    Approved,
    /// Declined (terminal).
    Rejected,
}

impl OvertimeStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::RevisionRequested => "REVISION_REQUESTED",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "REVISION_REQUESTED" => Some(Self::RevisionRequested),
            "APPROVED" => Some(Self::Approved),
            "REJECTED" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Entries may only change while the request is in one of these states.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending | Self::RevisionRequested)
    }

    /// Dates of requests in these states block the same date elsewhere.
    #[must_use]
    pub const fn claims_dates(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

impl fmt::Display for OvertimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decision taken by an approver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    /// Accept the request.
    Approve,
    /// Decline the request.
    Reject,
    /// Send the request back for changes.
    RequestRevision,
}

impl ApprovalDecision {
    /// Status reached by taking this decision on a pending request.
    #[must_use]
    pub const fn target_status(self) -> OvertimeStatus {
        match self {
            Self::Approve => OvertimeStatus::Approved,
            Self::Reject => OvertimeStatus::Rejected,
            Self::RequestRevision => OvertimeStatus::RevisionRequested,
        }
    }
}

/// One recorded decision in a request's approval chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// Who decided.
    pub approver: EmployeeId,
    /// What was decided.
    pub decision: ApprovalDecision,
    /// Approver comment (required for reject and revision).
    pub comment: Option<String>,
    /// When the decision was recorded.
    pub decided_at: DateTime<Utc>,
}

/// A batch of overtime entries submitted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeRequest {
    /// Unique identifier.
    pub id: OvertimeRequestId,
    /// Owner of the request.
    pub employee_id: EmployeeId,
    /// One to five entries with distinct dates.
    pub entries: Vec<OvertimeEntry>,
    /// Current status.
    pub status: OvertimeStatus,
    /// When the request was last submitted.
    pub submitted_at: DateTime<Utc>,
    /// Decisions in the order they were taken.
    pub approval_chain: Vec<ApprovalStep>,
}

impl OvertimeRequest {
    /// Sum of entry hours.
    #[must_use]
    pub fn total_hours(&self) -> Hours {
        self.entries.iter().map(|e| e.hours).sum()
    }

    /// Distinct entry dates.
    #[must_use]
    pub fn dates(&self) -> BTreeSet<NaiveDate> {
        self.entries.iter().map(|e| e.date).collect()
    }

    /// Hours of entries dated after `after` (when set) and on or before
    /// the last day of `period`.
    #[must_use]
    pub fn hours_through(&self, after: Option<NaiveDate>, period: RecapPeriod) -> Hours {
        let last_day = period.last_day();
        self.entries
            .iter()
            .filter(|e| e.date <= last_day && after.is_none_or(|a| e.date > a))
            .map(|e| e.hours)
            .sum()
    }
}

/// Running total of approved, not yet recapped hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeBalance {
    /// Owner.
    pub employee_id: EmployeeId,
    /// Approved hours accumulated since the last recap.
    pub current_balance: Hours,
}

/// A finalised monthly recap for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeRecap {
    /// Unique identifier.
    pub id: OvertimeRecapId,
    /// Owner.
    pub employee_id: EmployeeId,
    /// Reconciled month.
    pub period: RecapPeriod,
    /// Approved hours in the period.
    pub approved_hours: Hours,
    /// Approved hours plus carryover.
    pub total_hours: Hours,
    /// Hours paid in cash.
    pub paid_hours: Hours,
    /// Hours above the payable cap.
    pub excess_hours: Hours,
    /// Carryover received from the previous recap.
    pub carryover_hours: Hours,
    /// Excess hours converted into TOIL days.
    pub total_toil_hours: Hours,
    /// Whole TOIL days credited.
    pub toil_days_created: i32,
    /// Excess left below one TOIL day, rolled to the next recap.
    pub remaining_hours: Hours,
    /// Cash amount for `paid_hours`.
    pub payment: Decimal,
    /// When the recap was committed.
    pub recapped_at: DateTime<Utc>,
    /// Who ran the recap.
    pub recapped_by: EmployeeId,
}

impl OvertimeRecap {
    /// Builds a recap record from a calculator result.
    #[must_use]
    pub fn from_result(
        employee_id: EmployeeId,
        period: RecapPeriod,
        approved_hours: Hours,
        result: &RecapResult,
        payment: Decimal,
        recapped_at: DateTime<Utc>,
        recapped_by: EmployeeId,
    ) -> Self {
        Self {
            id: OvertimeRecapId::new(),
            employee_id,
            period,
            approved_hours,
            total_hours: result.total_hours,
            paid_hours: result.paid_hours,
            excess_hours: result.excess_hours,
            carryover_hours: result.carryover_hours,
            total_toil_hours: result.total_toil_hours,
            toil_days_created: result.toil_days_created,
            remaining_hours: result.remaining_hours,
            payment,
            recapped_at,
            recapped_by,
        }
    }
}
