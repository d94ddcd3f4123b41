//! Overtime error types.

use accrual_shared::types::{EmployeeId, OvertimeRequestId};
use chrono::NaiveDate;
use thiserror::Error;

use crate::error::ErrorCategory;
use crate::store::StoreError;

use super::period::RecapPeriod;
use super::types::OvertimeStatus;
use super::validation::FieldError;

/// Errors that can occur while submitting, deciding or recapping overtime.
#[derive(Debug, Error)]
pub enum OvertimeError {
    /// The batch failed validation; every violation is listed.
    #[error("Overtime entries failed validation ({} issue(s))", .0.len())]
    Validation(Vec<FieldError>),

    /// Entries fall on regular workdays and the submitter did not confirm.
    #[error("Entries on regular workdays need confirmation: {dates:?}")]
    WeekdayConfirmationRequired {
        /// Dates that need confirming.
        dates: Vec<NaiveDate>,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: OvertimeStatus,
        /// The attempted target status.
        to: OvertimeStatus,
    },

    /// Rejecting or requesting revision without a comment.
    #[error("A comment is required for this decision")]
    CommentRequired,

    /// An employee tried to decide their own request.
    #[error("Employees cannot decide their own overtime requests")]
    SelfApproval,

    /// Only the owner may resubmit a request.
    #[error("Only the request owner can resubmit it")]
    NotRequestOwner,

    /// Approval would add hours to a month that was already recapped.
    #[error("Entries on or before {last_recap_date} belong to a recapped period")]
    EntriesInRecappedPeriod {
        /// Last day of the latest recap.
        last_recap_date: NaiveDate,
    },

    /// Negative hour input.
    #[error("Overtime hours cannot be negative")]
    NegativeHours,

    /// Unusable policy constant.
    #[error("Invalid overtime policy: {0}")]
    InvalidPolicy(String),

    /// Month outside 1-12 or unrepresentable year.
    #[error("Invalid recap period {year}-{month}")]
    InvalidPeriod {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u32,
    },

    /// The period has not ended yet.
    #[error("Period {period} is not closed yet")]
    PeriodNotClosed {
        /// Requested period.
        period: RecapPeriod,
    },

    /// A recap already exists for this employee and period.
    #[error("Employee {employee_id} already has a recap for {period}")]
    DuplicateRecap {
        /// Employee.
        employee_id: EmployeeId,
        /// Period.
        period: RecapPeriod,
    },

    /// The period is older than the employee's latest recap.
    #[error("Period {period} precedes the latest recap {latest}")]
    PeriodBeforeLastRecap {
        /// Requested period.
        period: RecapPeriod,
        /// Latest recapped period.
        latest: RecapPeriod,
    },

    /// Nothing to recap.
    #[error("Employee {employee_id} has no approved overtime in {period}")]
    NoApprovedOvertime {
        /// Employee.
        employee_id: EmployeeId,
        /// Period.
        period: RecapPeriod,
    },

    /// Overtime request not found.
    #[error("Overtime request {0} not found")]
    RequestNotFound(OvertimeRequestId),

    /// Persistence collaborator failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OvertimeError {
    /// Returns the taxonomy class of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_)
            | Self::CommentRequired
            | Self::NegativeHours
            | Self::InvalidPeriod { .. } => ErrorCategory::Validation,
            Self::SelfApproval | Self::NotRequestOwner => ErrorCategory::Forbidden,
            Self::RequestNotFound(_) => ErrorCategory::NotFound,
            Self::InvalidTransition { .. } => ErrorCategory::State,
            Self::DuplicateRecap { .. }
            | Self::PeriodBeforeLastRecap { .. }
            | Self::EntriesInRecappedPeriod { .. } => ErrorCategory::Conflict,
            Self::WeekdayConfirmationRequired { .. }
            | Self::PeriodNotClosed { .. }
            | Self::NoApprovedOvertime { .. } => ErrorCategory::BusinessRule,
            Self::InvalidPolicy(_) => ErrorCategory::Internal,
            Self::Store(e) => e.category(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_)
            | Self::CommentRequired
            | Self::NegativeHours
            | Self::InvalidPeriod { .. } => 400,

            Self::SelfApproval | Self::NotRequestOwner => 403,

            Self::RequestNotFound(_) => 404,

            Self::InvalidTransition { .. }
            | Self::DuplicateRecap { .. }
            | Self::PeriodBeforeLastRecap { .. }
            | Self::EntriesInRecappedPeriod { .. } => 409,

            Self::WeekdayConfirmationRequired { .. }
            | Self::PeriodNotClosed { .. }
            | Self::NoApprovedOvertime { .. } => 422,

            Self::InvalidPolicy(_) => 500,

            Self::Store(e) => e.status_code(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::WeekdayConfirmationRequired { .. } => "WEEKDAY_CONFIRMATION_REQUIRED",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CommentRequired => "COMMENT_REQUIRED",
            Self::SelfApproval => "SELF_APPROVAL",
            Self::NotRequestOwner => "NOT_REQUEST_OWNER",
            Self::EntriesInRecappedPeriod { .. } => "ENTRIES_IN_RECAPPED_PERIOD",
            Self::NegativeHours => "NEGATIVE_HOURS",
            Self::InvalidPolicy(_) => "INVALID_POLICY",
            Self::InvalidPeriod { .. } => "INVALID_PERIOD",
            Self::PeriodNotClosed { .. } => "PERIOD_NOT_CLOSED",
            Self::DuplicateRecap { .. } => "DUPLICATE_RECAP",
            Self::PeriodBeforeLastRecap { .. } => "PERIOD_BEFORE_LAST_RECAP",
            Self::NoApprovedOvertime { .. } => "NO_APPROVED_OVERTIME",
            Self::RequestNotFound(_) => "OVERTIME_REQUEST_NOT_FOUND",
            Self::Store(e) => e.error_code(),
        }
    }

    /// Returns true if retrying the same call may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_transient())
    }
}
