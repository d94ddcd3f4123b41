//! Bulk recap result types.

use accrual_shared::types::EmployeeId;
use serde::Serialize;

use crate::overtime::{OvertimeError, OvertimeRecap, RecapPeriod};

/// Why one employee's recap did not commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    /// Employee whose recap failed.
    pub employee_id: EmployeeId,
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable reason.
    pub reason: String,
    /// Attempts made before giving up.
    pub attempts: u32,
}

impl BulkFailure {
    /// Captures `error` for `employee_id`.
    #[must_use]
    pub fn from_error(employee_id: EmployeeId, error: &OvertimeError, attempts: u32) -> Self {
        Self {
            employee_id,
            code: error.error_code().to_string(),
            reason: error.to_string(),
            attempts,
        }
    }
}

/// Summary of a bulk run. Partial failure is reported here, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Period that was recapped.
    pub period: RecapPeriod,
    /// Employees targeted after de-duplication.
    pub total: usize,
    /// Committed recaps, in input order.
    pub succeeded: Vec<OvertimeRecap>,
    /// Failures, in input order.
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    /// Number of committed recaps.
    #[must_use]
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of failed employees.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// True when some but not all employees failed.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty() && !self.succeeded.is_empty()
    }
}
