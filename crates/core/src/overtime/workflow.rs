//! Overtime request state transitions.
//!
//! Stateless: every function takes the current request and returns the
//! next version of it, leaving persistence to the caller.

use accrual_shared::types::{EmployeeId, OvertimeRequestId};
use chrono::{DateTime, Utc};

use super::error::OvertimeError;
use super::types::{ApprovalDecision, ApprovalStep, OvertimeEntry, OvertimeRequest, OvertimeStatus};
use super::validation::ValidationResult;

/// Stateless service for overtime request transitions.
pub struct OvertimeWorkflow;

impl OvertimeWorkflow {
    /// Creates a PENDING request from a validated batch.
    ///
    /// # Errors
    ///
    /// * `Validation` if the batch has errors
    /// * `WeekdayConfirmationRequired` if it has warnings and `confirm_weekday` is false
    pub fn submit(
        employee_id: EmployeeId,
        entries: Vec<OvertimeEntry>,
        validation: &ValidationResult,
        confirm_weekday: bool,
        now: DateTime<Utc>,
    ) -> Result<OvertimeRequest, OvertimeError> {
        Self::accept_validation(validation, confirm_weekday)?;

        Ok(OvertimeRequest {
            id: OvertimeRequestId::new(),
            employee_id,
            entries,
            status: OvertimeStatus::Pending,
            submitted_at: now,
            approval_chain: Vec::new(),
        })
    }

    /// Replaces the entries of a request sent back for revision.
    ///
    /// # Errors
    ///
    /// * `NotRequestOwner` if `actor` does not own the request
    /// * `InvalidTransition` unless the request is REVISION_REQUESTED
    /// * `Validation` / `WeekdayConfirmationRequired` as for [`submit`](Self::submit)
    pub fn resubmit(
        request: &OvertimeRequest,
        actor: EmployeeId,
        entries: Vec<OvertimeEntry>,
        validation: &ValidationResult,
        confirm_weekday: bool,
        now: DateTime<Utc>,
    ) -> Result<OvertimeRequest, OvertimeError> {
        if actor != request.employee_id {
            return Err(OvertimeError::NotRequestOwner);
        }
        if request.status != OvertimeStatus::RevisionRequested {
            return Err(OvertimeError::InvalidTransition {
                from: request.status,
                to: OvertimeStatus::Pending,
            });
        }
        Self::accept_validation(validation, confirm_weekday)?;

        Ok(OvertimeRequest {
            entries,
            status: OvertimeStatus::Pending,
            submitted_at: now,
            ..request.clone()
        })
    }

    /// Records an approver decision on a PENDING request.
    ///
    /// # Errors
    ///
    /// * `SelfApproval` if the approver owns the request
    /// * `CommentRequired` when rejecting or requesting revision without a comment
    /// * `InvalidTransition` unless the request is PENDING
    pub fn decide(
        request: &OvertimeRequest,
        decision: ApprovalDecision,
        approver: EmployeeId,
        comment: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<OvertimeRequest, OvertimeError> {
        if approver == request.employee_id {
            return Err(OvertimeError::SelfApproval);
        }

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if decision != ApprovalDecision::Approve && comment.is_none() {
            return Err(OvertimeError::CommentRequired);
        }

        let target = decision.target_status();
        if !Self::is_valid_transition(request.status, target) {
            return Err(OvertimeError::InvalidTransition {
                from: request.status,
                to: target,
            });
        }

        let mut next = request.clone();
        next.status = target;
        next.approval_chain.push(ApprovalStep {
            approver,
            decision,
            comment,
            decided_at: now,
        });
        Ok(next)
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved | Rejected | RevisionRequested
    /// - RevisionRequested → Pending
    #[must_use]
    pub fn is_valid_transition(from: OvertimeStatus, to: OvertimeStatus) -> bool {
        matches!(
            (from, to),
            (
                OvertimeStatus::Pending,
                OvertimeStatus::Approved | OvertimeStatus::Rejected | OvertimeStatus::RevisionRequested
            ) | (OvertimeStatus::RevisionRequested, OvertimeStatus::Pending)
        )
    }

    fn accept_validation(
        validation: &ValidationResult,
        confirm_weekday: bool,
    ) -> Result<(), OvertimeError> {
        if !validation.ok {
            return Err(OvertimeError::Validation(validation.errors.clone()));
        }
        if validation.needs_confirmation() && !confirm_weekday {
            return Err(OvertimeError::WeekdayConfirmationRequired {
                dates: validation.warnings.iter().map(|w| w.date).collect(),
            });
        }
        Ok(())
    }
}
