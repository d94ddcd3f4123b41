//! Leave operations: submission, transitions, balances, timelines.

use accrual_shared::types::{EmployeeId, LeaveRequestId};
use chrono::Datelike;
use serde::Serialize;
use tracing::{info, instrument};

use crate::leave::{
    LeaveAction, LeaveBalance, LeaveContext, LeaveError, LeaveEvent, LeaveRequest, LeaveWorkflow,
    NewLeaveRequest, leave_timeline,
};
use crate::policy::Clock;
use crate::store::AccrualStore;

use super::AccrualService;

/// A committed leave transition and the balance it left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommittedLeaveTransition {
    /// Request in its new state.
    pub request: LeaveRequest,
    /// Balance for the request's year after the transition.
    pub balance: LeaveBalance,
}

impl<S, C> AccrualService<S, C>
where
    S: AccrualStore,
    C: Clock,
{
    /// Leave balance of an employee for one year.
    pub fn leave_balance(&self, employee_id: EmployeeId, year: i32) -> Result<LeaveBalance, LeaveError> {
        self.store.employee_policy(employee_id)?;
        Ok(self.store.leave_balance(employee_id, year)?)
    }

    /// Stores a PENDING leave request after checking availability against
    /// the balance and the employee's other pending requests.
    #[instrument(skip(self, input), fields(leave_type = %input.leave_type))]
    pub fn submit_leave_request(
        &self,
        employee_id: EmployeeId,
        input: NewLeaveRequest,
    ) -> Result<LeaveRequest, LeaveError> {
        self.store.with_employee_lock(employee_id, || {
            self.store.employee_policy(employee_id)?;
            let year = input.start_date.year();
            let balance = self.store.leave_balance(employee_id, year)?;
            let held = self.store.leave_commitments(employee_id, year, None)?;
            let ctx = LeaveContext {
                balance: &balance,
                held: &held,
                policy: &self.policy,
                now: self.clock.now(),
            };
            let request = LeaveWorkflow::submit(employee_id, input, &ctx)?;
            self.store.insert_leave_request(&request)?;
            info!(request_id = %request.id, days = request.total_days, "Leave request submitted");
            Ok(request)
        })
    }

    /// Approves, rejects or cancels a leave request, committing the request
    /// and its balance mutation together.
    ///
    /// # Errors
    ///
    /// Returns a state error for an illegal transition, including
    /// cancellation on or after the start date.
    #[instrument(skip(self, comment))]
    pub fn transition_leave_request(
        &self,
        request_id: LeaveRequestId,
        action: LeaveAction,
        actor: EmployeeId,
        comment: Option<String>,
    ) -> Result<CommittedLeaveTransition, LeaveError> {
        let employee_id = self.store.leave_request(request_id)?.employee_id;
        self.store.with_employee_lock(employee_id, || {
            let current = self.store.leave_request(request_id)?;
            let year = current.year();
            let balance = self.store.leave_balance(employee_id, year)?;
            let held = self
                .store
                .leave_commitments(employee_id, year, Some(request_id))?;
            let ctx = LeaveContext {
                balance: &balance,
                held: &held,
                policy: &self.policy,
                now: self.clock.now(),
            };
            let transition = LeaveWorkflow::transition(&current, action, actor, comment, &ctx)?;

            let balance = self.store.commit_leave_transition(
                current.status,
                &transition.request,
                transition.mutation,
            )?;

            info!(
                %request_id,
                from = %current.status,
                to = %transition.request.status,
                annual_remaining = balance.annual_remaining,
                toil_remaining = balance.toil_remaining,
                "Leave request transitioned"
            );
            Ok(CommittedLeaveTransition {
                request: transition.request,
                balance,
            })
        })
    }

    /// Loads a leave request.
    pub fn leave_request(&self, request_id: LeaveRequestId) -> Result<LeaveRequest, LeaveError> {
        Ok(self.store.leave_request(request_id)?)
    }

    /// Lifecycle events of a leave request, submission first.
    pub fn leave_timeline(&self, request_id: LeaveRequestId) -> Result<Vec<LeaveEvent>, LeaveError> {
        let request = self.store.leave_request(request_id)?;
        Ok(leave_timeline(&request))
    }
}
