//! Leave request state machine.
//!
//! Submission holds days without debiting them; approval debits the
//! request's bucket; cancellation before the start date credits it back.
//! Functions here decide the next request state and the balance mutation
//! that goes with it; the store commits both together.

use accrual_shared::types::{EmployeeId, LeaveRequestId};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::policy::Policy;

use super::days::leave_span;
use super::error::LeaveError;
use super::ledger::{BalanceMutation, LeaveBalance};
use super::types::{
    LeaveAction, LeaveCommitments, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest,
};

/// Result of a successful transition: the updated request and the balance
/// change to commit with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveTransition {
    /// Request in its new state.
    pub request: LeaveRequest,
    /// Balance change, if the transition moves days.
    pub mutation: Option<BalanceMutation>,
}

/// Snapshot a transition is decided against.
#[derive(Debug, Clone, Copy)]
pub struct LeaveContext<'a> {
    /// Balance for the request's year.
    pub balance: &'a LeaveBalance,
    /// Days held by the employee's other requests that year.
    pub held: &'a LeaveCommitments,
    /// Policy constants.
    pub policy: &'a Policy,
    /// Current time.
    pub now: DateTime<Utc>,
}

/// Stateless service for leave request transitions.
pub struct LeaveWorkflow;

impl LeaveWorkflow {
    /// Builds a PENDING request after checking dates and availability.
    ///
    /// # Errors
    ///
    /// * `InvalidDateRange` if `end_date < start_date`
    /// * `StartInPast` if the leave starts before today (sick leave excepted)
    /// * `NoWorkingDays` if the range holds no working day
    /// * `InsufficientBalance` / unpaid cap errors if the days are not available
    pub fn submit(
        employee_id: EmployeeId,
        input: NewLeaveRequest,
        ctx: &LeaveContext<'_>,
    ) -> Result<LeaveRequest, LeaveError> {
        let fixed = input.leave_type.fixed_days().is_some();
        if !fixed && input.end_date < input.start_date {
            return Err(LeaveError::InvalidDateRange {
                start_date: input.start_date,
                end_date: input.end_date,
            });
        }

        let today = ctx.policy.today(ctx.now);
        if input.start_date < today && !input.leave_type.allows_backdating() {
            return Err(LeaveError::StartInPast {
                leave_type: input.leave_type,
                start_date: input.start_date,
                today,
            });
        }

        let (end_date, total_days) =
            leave_span(input.leave_type, input.start_date, input.end_date, ctx.policy);
        if total_days == 0 {
            return Err(LeaveError::NoWorkingDays {
                start_date: input.start_date,
                end_date,
            });
        }

        Self::ensure_available(input.leave_type, total_days, ctx, true)?;

        Ok(LeaveRequest {
            id: LeaveRequestId::new(),
            employee_id,
            leave_type: input.leave_type,
            start_date: input.start_date,
            end_date,
            total_days,
            reason: input.reason.filter(|r| !r.trim().is_empty()),
            status: LeaveStatus::Pending,
            created_at: ctx.now,
            approved_at: None,
            approved_by: None,
            rejected_at: None,
            rejected_by: None,
            rejection_reason: None,
            cancelled_at: None,
            cancellation_reason: None,
        })
    }

    /// Applies `action` to `request`.
    ///
    /// # Arguments
    /// * `request` - The request in its stored state
    /// * `action` - Approve, reject or cancel
    /// * `actor` - Who performs the action
    /// * `comment` - Rejection reason (required) or cancellation reason (optional)
    /// * `ctx` - Balance, holds (excluding this request), policy and time
    ///
    /// # Errors
    ///
    /// * `InvalidTransition` if the action is not allowed from the current status
    /// * `SelfApproval` / `NotRequestOwner` for the wrong actor
    /// * `RejectionReasonRequired` when rejecting without a reason
    /// * `CancellationWindowClosed` when cancelling on or after the start date
    /// * `InsufficientBalance` / unpaid cap errors on approval
    pub fn transition(
        request: &LeaveRequest,
        action: LeaveAction,
        actor: EmployeeId,
        comment: Option<String>,
        ctx: &LeaveContext<'_>,
    ) -> Result<LeaveTransition, LeaveError> {
        match action {
            LeaveAction::Approve => Self::approve(request, actor, ctx),
            LeaveAction::Reject => Self::reject(request, actor, comment, ctx.now),
            LeaveAction::Cancel => Self::cancel(request, actor, comment, ctx),
        }
    }

    /// Approve a pending request, debiting its bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is not pending, the approver owns it,
    /// or the bucket cannot cover it.
    pub fn approve(
        request: &LeaveRequest,
        approver: EmployeeId,
        ctx: &LeaveContext<'_>,
    ) -> Result<LeaveTransition, LeaveError> {
        Self::ensure_status(request, LeaveStatus::Pending, LeaveStatus::Approved)?;
        if approver == request.employee_id {
            return Err(LeaveError::SelfApproval);
        }

        Self::ensure_available(request.leave_type, request.total_days, ctx, false)?;
        let mutation = request.leave_type.bucket().map(|bucket| BalanceMutation::Debit {
            bucket,
            days: request.total_days,
        });
        if let Some(mutation) = mutation {
            ctx.balance.apply(mutation)?;
        }

        let mut next = request.clone();
        next.status = LeaveStatus::Approved;
        next.approved_at = Some(ctx.now);
        next.approved_by = Some(approver);
        Ok(LeaveTransition {
            request: next,
            mutation,
        })
    }

    /// Reject a pending request. No balance effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is blank, the request is not pending,
    /// or the approver owns it.
    pub fn reject(
        request: &LeaveRequest,
        approver: EmployeeId,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<LeaveTransition, LeaveError> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .ok_or(LeaveError::RejectionReasonRequired)?;
        Self::ensure_status(request, LeaveStatus::Pending, LeaveStatus::Rejected)?;
        if approver == request.employee_id {
            return Err(LeaveError::SelfApproval);
        }

        let mut next = request.clone();
        next.status = LeaveStatus::Rejected;
        next.rejected_at = Some(now);
        next.rejected_by = Some(approver);
        next.rejection_reason = Some(reason);
        Ok(LeaveTransition {
            request: next,
            mutation: None,
        })
    }

    /// Cancel an approved request before it starts, crediting its bucket.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not the owner, the request is not
    /// approved, or its start date has been reached.
    pub fn cancel(
        request: &LeaveRequest,
        actor: EmployeeId,
        reason: Option<String>,
        ctx: &LeaveContext<'_>,
    ) -> Result<LeaveTransition, LeaveError> {
        if actor != request.employee_id {
            return Err(LeaveError::NotRequestOwner);
        }
        Self::ensure_status(request, LeaveStatus::Approved, LeaveStatus::Cancelled)?;

        let today = ctx.policy.today(ctx.now);
        if request.start_date <= today {
            return Err(LeaveError::CancellationWindowClosed {
                start_date: request.start_date,
                today,
            });
        }

        let mutation = request.leave_type.bucket().map(|bucket| BalanceMutation::Credit {
            bucket,
            days: request.total_days,
        });

        let mut next = request.clone();
        next.status = LeaveStatus::Cancelled;
        next.cancelled_at = Some(ctx.now);
        next.cancellation_reason = reason.filter(|r| !r.trim().is_empty());
        Ok(LeaveTransition {
            request: next,
            mutation,
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved | Rejected
    /// - Approved → Cancelled
    #[must_use]
    pub fn is_valid_transition(from: LeaveStatus, to: LeaveStatus) -> bool {
        matches!(
            (from, to),
            (LeaveStatus::Pending, LeaveStatus::Approved | LeaveStatus::Rejected)
                | (LeaveStatus::Approved, LeaveStatus::Cancelled)
        )
    }

    fn ensure_status(
        request: &LeaveRequest,
        expected: LeaveStatus,
        to: LeaveStatus,
    ) -> Result<(), LeaveError> {
        if request.status == expected && Self::is_valid_transition(expected, to) {
            Ok(())
        } else {
            Err(LeaveError::InvalidTransition {
                from: request.status,
                to,
            })
        }
    }

    /// On submission, pending holds of other requests count against the
    /// bucket; on approval only the ledger's remaining days do.
    fn ensure_available(
        leave_type: LeaveType,
        days: i32,
        ctx: &LeaveContext<'_>,
        count_holds: bool,
    ) -> Result<(), LeaveError> {
        if let Some(bucket) = leave_type.bucket() {
            let held = if count_holds {
                ctx.held.pending_in(bucket)
            } else {
                0
            };
            let available = ctx.balance.remaining(bucket) - held;
            if days > available {
                return Err(LeaveError::InsufficientBalance {
                    bucket,
                    requested: days,
                    available: available.max(0),
                });
            }
        }

        if leave_type == LeaveType::Unpaid {
            let policy = ctx.policy;
            if days > policy.unpaid_max_consecutive_days {
                return Err(LeaveError::UnpaidConsecutiveCapExceeded {
                    requested: days,
                    max: policy.unpaid_max_consecutive_days,
                });
            }
            let total = ctx.held.unpaid_days + days;
            if total > policy.unpaid_max_days_per_year {
                return Err(LeaveError::UnpaidYearlyCapExceeded {
                    requested: total,
                    max: policy.unpaid_max_days_per_year,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::types::LeaveBucket;
    use chrono::{NaiveDate, TimeZone};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, d).unwrap()
    }

    /// 2026-04-20 09:00 in Jakarta.
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 20, 2, 0, 0).unwrap()
    }

    fn annual(start: NaiveDate, end: NaiveDate) -> NewLeaveRequest {
        NewLeaveRequest {
            leave_type: LeaveType::Annual,
            start_date: start,
            end_date: end,
            reason: Some("Family trip".to_string()),
        }
    }

    struct Fixture {
        owner: EmployeeId,
        balance: LeaveBalance,
        held: LeaveCommitments,
        policy: Policy,
    }

    impl Fixture {
        fn new() -> Self {
            let owner = EmployeeId::new();
            Self {
                owner,
                balance: LeaveBalance::new(owner, 2026, 12),
                held: LeaveCommitments::default(),
                policy: Policy::default(),
            }
        }

        fn ctx_at(&self, now: DateTime<Utc>) -> LeaveContext<'_> {
            LeaveContext {
                balance: &self.balance,
                held: &self.held,
                policy: &self.policy,
                now,
            }
        }

        fn ctx(&self) -> LeaveContext<'_> {
            self.ctx_at(now())
        }
    }

    #[test]
    fn test_submit_counts_working_days() {
        let fx = Fixture::new();
        let request =
            LeaveWorkflow::submit(fx.owner, annual(date(5, 4), date(5, 6)), &fx.ctx()).unwrap();
        assert_eq!(request.total_days, 3);
        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.created_at, now());
    }

    #[test]
    fn test_submit_rejects_reversed_range() {
        let fx = Fixture::new();
        let result = LeaveWorkflow::submit(fx.owner, annual(date(5, 6), date(5, 4)), &fx.ctx());
        assert!(matches!(result, Err(LeaveError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_submit_rejects_weekend_only() {
        let fx = Fixture::new();
        let result = LeaveWorkflow::submit(fx.owner, annual(date(5, 9), date(5, 10)), &fx.ctx());
        assert!(matches!(result, Err(LeaveError::NoWorkingDays { .. })));
    }

    #[test]
    fn test_submit_rejects_past_start_except_sick() {
        let fx = Fixture::new();
        let past = annual(date(4, 14), date(4, 15));
        let result = LeaveWorkflow::submit(fx.owner, past.clone(), &fx.ctx());
        assert!(matches!(result, Err(LeaveError::StartInPast { .. })));

        let sick = NewLeaveRequest {
            leave_type: LeaveType::Sick,
            ..past
        };
        assert!(LeaveWorkflow::submit(fx.owner, sick, &fx.ctx()).is_ok());
    }

    #[test]
    fn test_submit_counts_pending_holds() {
        let mut fx = Fixture::new();
        fx.held.pending_annual = 10;
        let result = LeaveWorkflow::submit(fx.owner, annual(date(5, 4), date(5, 6)), &fx.ctx());
        assert!(matches!(
            result,
            Err(LeaveError::InsufficientBalance {
                requested: 3,
                available: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_toil_needs_earned_days() {
        let fx = Fixture::new();
        let input = NewLeaveRequest {
            leave_type: LeaveType::Toil,
            ..annual(date(5, 4), date(5, 4))
        };
        let result = LeaveWorkflow::submit(fx.owner, input, &fx.ctx());
        assert!(matches!(result, Err(LeaveError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_unpaid_caps() {
        let mut fx = Fixture::new();
        let long = NewLeaveRequest {
            leave_type: LeaveType::Unpaid,
            ..annual(date(5, 4), date(5, 11))
        };
        let result = LeaveWorkflow::submit(fx.owner, long, &fx.ctx());
        assert!(matches!(
            result,
            Err(LeaveError::UnpaidConsecutiveCapExceeded { requested: 6, max: 5 })
        ));

        fx.held.unpaid_days = 12;
        let short = NewLeaveRequest {
            leave_type: LeaveType::Unpaid,
            ..annual(date(5, 4), date(5, 6))
        };
        let result = LeaveWorkflow::submit(fx.owner, short, &fx.ctx());
        assert!(matches!(
            result,
            Err(LeaveError::UnpaidYearlyCapExceeded { requested: 15, max: 14 })
        ));
    }

    #[test]
    fn test_fixed_duration_types() {
        let fx = Fixture::new();
        let input = NewLeaveRequest {
            leave_type: LeaveType::Marriage,
            ..annual(date(5, 4), date(5, 1))
        };
        let request = LeaveWorkflow::submit(fx.owner, input, &fx.ctx()).unwrap();
        assert_eq!(request.total_days, 3);
        assert_eq!(request.end_date, date(5, 6));
    }

    #[test]
    fn test_approve_debits_annual() {
        let fx = Fixture::new();
        let request =
            LeaveWorkflow::submit(fx.owner, annual(date(5, 4), date(5, 6)), &fx.ctx()).unwrap();
        let manager = EmployeeId::new();
        let t = LeaveWorkflow::transition(&request, LeaveAction::Approve, manager, None, &fx.ctx())
            .unwrap();
        assert_eq!(t.request.status, LeaveStatus::Approved);
        assert_eq!(t.request.approved_by, Some(manager));
        assert_eq!(
            t.mutation,
            Some(BalanceMutation::Debit {
                bucket: LeaveBucket::Annual,
                days: 3
            })
        );
        let after = fx.balance.apply(t.mutation.unwrap()).unwrap();
        assert_eq!(after.annual_remaining, 9);
    }

    #[test]
    fn test_sick_approval_has_no_mutation() {
        let fx = Fixture::new();
        let input = NewLeaveRequest {
            leave_type: LeaveType::Sick,
            ..annual(date(5, 4), date(5, 5))
        };
        let request = LeaveWorkflow::submit(fx.owner, input, &fx.ctx()).unwrap();
        let t = LeaveWorkflow::approve(&request, EmployeeId::new(), &fx.ctx()).unwrap();
        assert_eq!(t.mutation, None);
    }

    #[test]
    fn test_self_approval_rejected() {
        let fx = Fixture::new();
        let request =
            LeaveWorkflow::submit(fx.owner, annual(date(5, 4), date(5, 6)), &fx.ctx()).unwrap();
        let result = LeaveWorkflow::approve(&request, fx.owner, &fx.ctx());
        assert!(matches!(result, Err(LeaveError::SelfApproval)));
    }

    #[test]
    fn test_reject_requires_reason() {
        let fx = Fixture::new();
        let request =
            LeaveWorkflow::submit(fx.owner, annual(date(5, 4), date(5, 6)), &fx.ctx()).unwrap();
        let missing = LeaveWorkflow::reject(&request, EmployeeId::new(), None, now());
        assert!(matches!(missing, Err(LeaveError::RejectionReasonRequired)));

        let t = LeaveWorkflow::reject(
            &request,
            EmployeeId::new(),
            Some("Release week".to_string()),
            now(),
        )
        .unwrap();
        assert_eq!(t.request.status, LeaveStatus::Rejected);
        assert_eq!(t.request.rejection_reason.as_deref(), Some("Release week"));
        assert_eq!(t.mutation, None);
    }

    #[test]
    fn test_cancel_credits_back() {
        let fx = Fixture::new();
        let request =
            LeaveWorkflow::submit(fx.owner, annual(date(5, 4), date(5, 6)), &fx.ctx()).unwrap();
        let approved = LeaveWorkflow::approve(&request, EmployeeId::new(), &fx.ctx())
            .unwrap()
            .request;
        let t = LeaveWorkflow::cancel(&approved, fx.owner, None, &fx.ctx()).unwrap();
        assert_eq!(t.request.status, LeaveStatus::Cancelled);
        assert!(t.request.cancelled_at.is_some());
        assert!(matches!(t.mutation, Some(BalanceMutation::Credit { days: 3, .. })));
    }

    #[test]
    fn test_cancel_after_start_is_state_error() {
        let fx = Fixture::new();
        let request =
            LeaveWorkflow::submit(fx.owner, annual(date(5, 4), date(5, 6)), &fx.ctx()).unwrap();
        let approved = LeaveWorkflow::approve(&request, EmployeeId::new(), &fx.ctx())
            .unwrap()
            .request;
        let later = Utc.with_ymd_and_hms(2026, 5, 5, 2, 0, 0).unwrap();
        let result = LeaveWorkflow::cancel(&approved, fx.owner, None, &fx.ctx_at(later));
        let err = result.unwrap_err();
        assert!(matches!(err, LeaveError::CancellationWindowClosed { .. }));
        assert_eq!(err.category(), crate::error::ErrorCategory::State);
    }

    #[test]
    fn test_cancel_pending_is_invalid_transition() {
        let fx = Fixture::new();
        let request =
            LeaveWorkflow::submit(fx.owner, annual(date(5, 4), date(5, 6)), &fx.ctx()).unwrap();
        let result = LeaveWorkflow::cancel(&request, fx.owner, None, &fx.ctx());
        assert!(matches!(
            result,
            Err(LeaveError::InvalidTransition {
                from: LeaveStatus::Pending,
                to: LeaveStatus::Cancelled
            })
        ));
    }

    #[test]
    fn test_cancel_by_other_employee_rejected() {
        let fx = Fixture::new();
        let request =
            LeaveWorkflow::submit(fx.owner, annual(date(5, 4), date(5, 6)), &fx.ctx()).unwrap();
        let result = LeaveWorkflow::cancel(&request, EmployeeId::new(), None, &fx.ctx());
        assert!(matches!(result, Err(LeaveError::NotRequestOwner)));
    }

    #[test]
    fn test_is_valid_transition() {
        assert!(LeaveWorkflow::is_valid_transition(
            LeaveStatus::Pending,
            LeaveStatus::Approved
        ));
        assert!(LeaveWorkflow::is_valid_transition(
            LeaveStatus::Approved,
            LeaveStatus::Cancelled
        ));
        assert!(!LeaveWorkflow::is_valid_transition(
            LeaveStatus::Rejected,
            LeaveStatus::Approved
        ));
        assert!(!LeaveWorkflow::is_valid_transition(
            LeaveStatus::Cancelled,
            LeaveStatus::Approved
        ));
        assert!(!LeaveWorkflow::is_valid_transition(
            LeaveStatus::Pending,
            LeaveStatus::Cancelled
        ));
    }
}
