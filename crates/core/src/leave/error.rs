//! Leave error types.

use chrono::NaiveDate;
use thiserror::Error;

use crate::error::ErrorCategory;
use crate::store::StoreError;

use super::types::{LeaveBucket, LeaveStatus, LeaveType};

/// Errors that can occur during leave submission and transitions.
#[derive(Debug, Error)]
pub enum LeaveError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: LeaveStatus,
        /// The attempted target status.
        to: LeaveStatus,
    },

    /// Cancellation attempted on or after the first day of leave.
    #[error("Leave starting {start_date} can no longer be cancelled (today is {today})")]
    CancellationWindowClosed {
        /// First day of leave.
        start_date: NaiveDate,
        /// Today in the policy timezone.
        today: NaiveDate,
    },

    /// Only the owner may cancel.
    #[error("Only the request owner can cancel it")]
    NotRequestOwner,

    /// An employee tried to decide their own request.
    #[error("Employees cannot decide their own leave requests")]
    SelfApproval,

    /// Rejection without a reason.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,

    /// `end_date` precedes `start_date`.
    #[error("End date {end_date} is before start date {start_date}")]
    InvalidDateRange {
        /// First day.
        start_date: NaiveDate,
        /// Last day.
        end_date: NaiveDate,
    },

    /// Leave would start in the past.
    #[error("{leave_type} cannot start in the past ({start_date} < {today})")]
    StartInPast {
        /// Leave type.
        leave_type: LeaveType,
        /// Requested start.
        start_date: NaiveDate,
        /// Today in the policy timezone.
        today: NaiveDate,
    },

    /// The range contains no working days.
    #[error("No working days between {start_date} and {end_date}")]
    NoWorkingDays {
        /// First day.
        start_date: NaiveDate,
        /// Last day.
        end_date: NaiveDate,
    },

    /// Not enough remaining days.
    #[error("Insufficient {bucket:?} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Bucket checked.
        bucket: LeaveBucket,
        /// Days requested.
        requested: i32,
        /// Days available after pending holds.
        available: i32,
    },

    /// Unpaid leave over the yearly cap.
    #[error("Unpaid leave would reach {requested} days this year, cap is {max}")]
    UnpaidYearlyCapExceeded {
        /// Total including this request.
        requested: i32,
        /// Yearly cap.
        max: i32,
    },

    /// Unpaid leave over the per-request cap.
    #[error("Unpaid leave of {requested} consecutive days exceeds {max}")]
    UnpaidConsecutiveCapExceeded {
        /// Days in this request.
        requested: i32,
        /// Consecutive-day cap.
        max: i32,
    },

    /// A mutation carried a non-positive day count.
    #[error("Day count must be positive, got {0}")]
    InvalidDays(i32),

    /// A balance broke one of its invariants.
    #[error("Leave balance invariant violated: {0}")]
    BalanceInvariant(String),

    /// Persistence collaborator failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LeaveError {
    /// Returns the taxonomy class of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidTransition { .. } | Self::CancellationWindowClosed { .. } => {
                ErrorCategory::State
            }
            Self::NotRequestOwner | Self::SelfApproval => ErrorCategory::Forbidden,
            Self::RejectionReasonRequired
            | Self::InvalidDateRange { .. }
            | Self::StartInPast { .. }
            | Self::NoWorkingDays { .. }
            | Self::InvalidDays(_) => ErrorCategory::Validation,
            Self::InsufficientBalance { .. }
            | Self::UnpaidYearlyCapExceeded { .. }
            | Self::UnpaidConsecutiveCapExceeded { .. } => ErrorCategory::BusinessRule,
            Self::BalanceInvariant(_) => ErrorCategory::Conflict,
            Self::Store(e) => e.category(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Store(e) => e.status_code(),
            other => match other.category() {
                ErrorCategory::Validation => 400,
                ErrorCategory::Forbidden => 403,
                ErrorCategory::NotFound => 404,
                ErrorCategory::State | ErrorCategory::Conflict => 409,
                ErrorCategory::BusinessRule => 422,
                ErrorCategory::PolicyUnavailable => 503,
                ErrorCategory::Internal => 500,
            },
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CancellationWindowClosed { .. } => "CANCELLATION_WINDOW_CLOSED",
            Self::NotRequestOwner => "NOT_REQUEST_OWNER",
            Self::SelfApproval => "SELF_APPROVAL",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::StartInPast { .. } => "START_IN_PAST",
            Self::NoWorkingDays { .. } => "NO_WORKING_DAYS",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::UnpaidYearlyCapExceeded { .. } => "UNPAID_YEARLY_CAP_EXCEEDED",
            Self::UnpaidConsecutiveCapExceeded { .. } => "UNPAID_CONSECUTIVE_CAP_EXCEEDED",
            Self::InvalidDays(_) => "INVALID_DAYS",
            Self::BalanceInvariant(_) => "BALANCE_INVARIANT",
            Self::Store(e) => e.error_code(),
        }
    }
}
