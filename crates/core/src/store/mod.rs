//! Persistence port.
//!
//! The engine reads snapshots and commits results through this trait; the
//! implementation owns transactional boundaries. Implementations must:
//! - serialize work per employee through [`AccrualStore::with_employee_lock`]
//!   without coupling different employees,
//! - reject a second recap for the same employee and period,
//! - commit a recap, the running-balance reset and the TOIL credit together,
//! - apply leave transitions only if the stored status still matches.

pub mod error;

use std::collections::BTreeSet;

use accrual_shared::types::{EmployeeId, Hours, LeaveRequestId, OvertimeRecapId, OvertimeRequestId};
use chrono::NaiveDate;

use crate::leave::{BalanceMutation, LeaveBalance, LeaveCommitments, LeaveRequest, LeaveStatus};
use crate::overtime::{OvertimeBalance, OvertimeRecap, OvertimeRequest, OvertimeStatus, RecapPeriod};
use crate::policy::EmployeePolicy;

pub use error::StoreError;

/// Storage and directory operations consumed by the engine.
pub trait AccrualStore: Send + Sync {
    /// Runs `f` while holding the employee's exclusive lock.
    fn with_employee_lock<T, F>(&self, employee_id: EmployeeId, f: F) -> T
    where
        F: FnOnce() -> T;

    /// Every known employee, in a stable order.
    fn employee_ids(&self) -> Result<Vec<EmployeeId>, StoreError>;

    /// Overtime rate and access tier of the employee.
    fn employee_policy(&self, employee_id: EmployeeId) -> Result<EmployeePolicy, StoreError>;

    /// Entry dates of the employee's PENDING and APPROVED requests,
    /// optionally ignoring one request.
    fn pending_or_approved_overtime_dates(
        &self,
        employee_id: EmployeeId,
        excluding: Option<OvertimeRequestId>,
    ) -> Result<BTreeSet<NaiveDate>, StoreError>;

    /// The employee's most recent recap.
    fn last_recap(&self, employee_id: EmployeeId) -> Result<Option<OvertimeRecap>, StoreError>;

    /// Last day of the employee's most recent recapped period.
    fn last_recap_date(&self, employee_id: EmployeeId) -> Result<Option<NaiveDate>, StoreError> {
        Ok(self
            .last_recap(employee_id)?
            .map(|recap| recap.period.last_day()))
    }

    /// The recap for one period, if any.
    fn recap(
        &self,
        employee_id: EmployeeId,
        period: RecapPeriod,
    ) -> Result<Option<OvertimeRecap>, StoreError>;

    /// Sum of APPROVED entry hours not yet covered by a recap and dated on
    /// or before the last day of `period`.
    fn approved_overtime_hours(
        &self,
        employee_id: EmployeeId,
        period: RecapPeriod,
    ) -> Result<Hours, StoreError>;

    /// Running balance of approved, unrecapped hours.
    fn overtime_balance(&self, employee_id: EmployeeId) -> Result<OvertimeBalance, StoreError>;

    /// Stores a new request. Fails with `Conflict` if one of its dates is
    /// already claimed by another PENDING or APPROVED request.
    fn insert_overtime_request(&self, request: &OvertimeRequest) -> Result<(), StoreError>;

    /// Loads a request.
    fn overtime_request(&self, id: OvertimeRequestId) -> Result<OvertimeRequest, StoreError>;

    /// Replaces a request if its stored status is still `expected`.
    /// Moving into APPROVED adds the request's hours to the running balance
    /// in the same write.
    fn update_overtime_request(
        &self,
        expected: OvertimeStatus,
        request: &OvertimeRequest,
    ) -> Result<(), StoreError>;

    /// Commits a recap together with the running-balance reset and the TOIL
    /// credit. Fails with `Conflict`, writing nothing, if the period is taken.
    fn persist_recap(&self, recap: &OvertimeRecap) -> Result<OvertimeRecapId, StoreError>;

    /// Leave balance for a year (a fresh quota if none is stored).
    fn leave_balance(&self, employee_id: EmployeeId, year: i32)
    -> Result<LeaveBalance, StoreError>;

    /// Days held by other pending or approved requests starting in `year`.
    fn leave_commitments(
        &self,
        employee_id: EmployeeId,
        year: i32,
        excluding: Option<LeaveRequestId>,
    ) -> Result<LeaveCommitments, StoreError>;

    /// Applies a balance mutation atomically and returns the new balance.
    /// Fails with `Conflict` if an invariant would break.
    fn persist_leave_balance_mutation(
        &self,
        employee_id: EmployeeId,
        year: i32,
        mutation: BalanceMutation,
    ) -> Result<LeaveBalance, StoreError>;

    /// Stores a new leave request.
    fn insert_leave_request(&self, request: &LeaveRequest) -> Result<(), StoreError>;

    /// Loads a leave request.
    fn leave_request(&self, id: LeaveRequestId) -> Result<LeaveRequest, StoreError>;

    /// Replaces a leave request and applies `mutation` in one write, if the
    /// stored status is still `expected`. Returns the resulting balance for
    /// the year the request starts in.
    fn commit_leave_transition(
        &self,
        expected: LeaveStatus,
        request: &LeaveRequest,
        mutation: Option<BalanceMutation>,
    ) -> Result<LeaveBalance, StoreError>;
}
