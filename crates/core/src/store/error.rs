//! Persistence collaborator errors.

use accrual_shared::types::{EmployeeId, LeaveRequestId, OvertimeRequestId};
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors reported by an [`AccrualStore`](super::AccrualStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached; safe to retry.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A write collided with existing state (unique key, stale status, balance floor).
    #[error("Store conflict: {0}")]
    Conflict(String),

    /// Unknown employee.
    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    /// Unknown overtime request.
    #[error("Overtime request {0} not found")]
    OvertimeRequestNotFound(OvertimeRequestId),

    /// Unknown leave request.
    #[error("Leave request {0} not found")]
    LeaveRequestNotFound(LeaveRequestId),
}

impl StoreError {
    /// Returns true if the failure is transient.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Returns the taxonomy class of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Unavailable(_) => ErrorCategory::PolicyUnavailable,
            Self::Conflict(_) => ErrorCategory::Conflict,
            Self::EmployeeNotFound(_)
            | Self::OvertimeRequestNotFound(_)
            | Self::LeaveRequestNotFound(_) => ErrorCategory::NotFound,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unavailable(_) => 503,
            Self::Conflict(_) => 409,
            Self::EmployeeNotFound(_)
            | Self::OvertimeRequestNotFound(_)
            | Self::LeaveRequestNotFound(_) => 404,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "POLICY_UNAVAILABLE",
            Self::Conflict(_) => "CONFLICT",
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::OvertimeRequestNotFound(_) => "OVERTIME_REQUEST_NOT_FOUND",
            Self::LeaveRequestNotFound(_) => "LEAVE_REQUEST_NOT_FOUND",
        }
    }
}
