//! Overtime operations: validation, submission, decisions, recaps.

use accrual_shared::types::{EmployeeId, Hours, OvertimeRequestId};
use tracing::{info, instrument, warn};

use crate::bulk::BulkOutcome;
use crate::overtime::{
    ApprovalDecision, OvertimeBalance, OvertimeEntry, OvertimeError, OvertimeRecap,
    OvertimeRequest, OvertimeStatus, OvertimeWorkflow, RecapCalculator, RecapPeriod,
    ValidationContext, ValidationResult, validate_entries,
};
use crate::policy::Clock;
use crate::store::{AccrualStore, StoreError};

use super::AccrualService;

impl<S, C> AccrualService<S, C>
where
    S: AccrualStore,
    C: Clock,
{
    /// Checks a batch against policy and the employee's current claims.
    ///
    /// Pure with respect to the store: nothing is written.
    pub fn validate_overtime_entries(
        &self,
        employee_id: EmployeeId,
        entries: &[OvertimeEntry],
    ) -> Result<ValidationResult, OvertimeError> {
        self.validate_against_store(employee_id, entries, None)
    }

    /// Validates and stores a new PENDING request.
    ///
    /// # Errors
    ///
    /// Returns the full field-error list if validation fails, or
    /// `WeekdayConfirmationRequired` if weekday dates were not confirmed.
    #[instrument(skip(self, entries), fields(entries = entries.len()))]
    pub fn submit_overtime_request(
        &self,
        employee_id: EmployeeId,
        entries: Vec<OvertimeEntry>,
        confirm_weekday: bool,
    ) -> Result<OvertimeRequest, OvertimeError> {
        self.store.with_employee_lock(employee_id, || {
            let validation = self.validate_against_store(employee_id, &entries, None)?;
            let request = OvertimeWorkflow::submit(
                employee_id,
                entries,
                &validation,
                confirm_weekday,
                self.clock.now(),
            )?;
            self.store.insert_overtime_request(&request)?;
            info!(request_id = %request.id, hours = %request.total_hours(), "Overtime request submitted");
            Ok(request)
        })
    }

    /// Replaces the entries of a REVISION_REQUESTED request and sends it back
    /// to PENDING. The request's own dates do not count as collisions.
    #[instrument(skip(self, entries))]
    pub fn resubmit_overtime_request(
        &self,
        request_id: OvertimeRequestId,
        actor: EmployeeId,
        entries: Vec<OvertimeEntry>,
        confirm_weekday: bool,
    ) -> Result<OvertimeRequest, OvertimeError> {
        let employee_id = self.load_overtime_request(request_id)?.employee_id;
        self.store.with_employee_lock(employee_id, || {
            let current = self.load_overtime_request(request_id)?;
            let validation =
                self.validate_against_store(employee_id, &entries, Some(request_id))?;
            let next = OvertimeWorkflow::resubmit(
                &current,
                actor,
                entries,
                &validation,
                confirm_weekday,
                self.clock.now(),
            )?;
            self.store.update_overtime_request(current.status, &next)?;
            info!(%request_id, "Overtime request resubmitted");
            Ok(next)
        })
    }

    /// Records an approver decision. Approval adds the request's hours to
    /// the employee's running balance.
    ///
    /// # Errors
    ///
    /// Besides the workflow errors, approval fails with
    /// `EntriesInRecappedPeriod` if an entry falls in an already recapped month.
    #[instrument(skip(self, comment))]
    pub fn decide_overtime_request(
        &self,
        request_id: OvertimeRequestId,
        approver: EmployeeId,
        decision: ApprovalDecision,
        comment: Option<String>,
    ) -> Result<OvertimeRequest, OvertimeError> {
        let employee_id = self.load_overtime_request(request_id)?.employee_id;
        self.store.with_employee_lock(employee_id, || {
            let current = self.load_overtime_request(request_id)?;
            let next = OvertimeWorkflow::decide(
                &current,
                decision,
                approver,
                comment,
                self.clock.now(),
            )?;

            if next.status == OvertimeStatus::Approved
                && let Some(last_recap_date) = self.store.last_recap_date(employee_id)?
                && current.entries.iter().any(|e| e.date <= last_recap_date)
            {
                return Err(OvertimeError::EntriesInRecappedPeriod { last_recap_date });
            }

            self.store.update_overtime_request(current.status, &next)?;
            info!(%request_id, status = %next.status, "Overtime request decided");
            Ok(next)
        })
    }

    /// Loads an overtime request.
    pub fn overtime_request(
        &self,
        request_id: OvertimeRequestId,
    ) -> Result<OvertimeRequest, OvertimeError> {
        self.load_overtime_request(request_id)
    }

    /// Running balance of approved, unrecapped hours.
    pub fn overtime_balance(&self, employee_id: EmployeeId) -> Result<OvertimeBalance, OvertimeError> {
        Ok(self.store.overtime_balance(employee_id)?)
    }

    /// Computes and commits the recap for one employee and a closed period.
    ///
    /// Carryover comes from the employee's latest recap. The recap, the
    /// running-balance reset and the TOIL credit commit together.
    ///
    /// # Errors
    ///
    /// * `PeriodNotClosed` if the period has not ended
    /// * `DuplicateRecap` if the period is already recapped
    /// * `PeriodBeforeLastRecap` if a later period is already recapped
    /// * `NoApprovedOvertime` if nothing was approved in the period
    #[instrument(skip(self))]
    pub fn compute_recap(
        &self,
        employee_id: EmployeeId,
        period: RecapPeriod,
        recapped_by: EmployeeId,
    ) -> Result<OvertimeRecap, OvertimeError> {
        let today = self.today();
        if !period.is_closed(today) {
            return Err(OvertimeError::PeriodNotClosed { period });
        }

        self.store.with_employee_lock(employee_id, || {
            let employee = self.store.employee_policy(employee_id)?;

            if self.store.recap(employee_id, period)?.is_some() {
                return Err(OvertimeError::DuplicateRecap {
                    employee_id,
                    period,
                });
            }
            let last = self.store.last_recap(employee_id)?;
            if let Some(latest) = last.as_ref().map(|r| r.period)
                && latest >= period
            {
                return Err(OvertimeError::PeriodBeforeLastRecap { period, latest });
            }
            let carryover = last.map_or(Hours::ZERO, |r| r.remaining_hours);

            let approved = self.store.approved_overtime_hours(employee_id, period)?;
            if approved.is_zero() {
                return Err(OvertimeError::NoApprovedOvertime {
                    employee_id,
                    period,
                });
            }

            let result = RecapCalculator::calculate_with_policy(approved, carryover, &self.policy)?;
            let payment = RecapCalculator::payment(result.paid_hours, &employee, &self.policy);
            let recap = OvertimeRecap::from_result(
                employee_id,
                period,
                approved,
                &result,
                payment,
                self.clock.now(),
                recapped_by,
            );

            match self.store.persist_recap(&recap) {
                Ok(_) => {}
                Err(StoreError::Conflict(reason)) => {
                    warn!(%employee_id, %period, %reason, "Recap key already taken");
                    return Err(OvertimeError::DuplicateRecap {
                        employee_id,
                        period,
                    });
                }
                Err(e) => return Err(e.into()),
            }

            info!(
                recap_id = %recap.id,
                paid = %recap.paid_hours,
                toil_days = recap.toil_days_created,
                carryover = %recap.remaining_hours,
                "Recap committed"
            );
            Ok(recap)
        })
    }

    /// Recaps `period` for every listed employee (all employees when the
    /// list is empty). Per-employee failures are reported in the outcome.
    ///
    /// # Errors
    ///
    /// Fails only if the employee directory cannot be read.
    #[instrument(skip(self, employee_ids), fields(requested = employee_ids.len()))]
    pub fn run_bulk_recap(
        &self,
        period: RecapPeriod,
        employee_ids: &[EmployeeId],
        recapped_by: EmployeeId,
    ) -> Result<BulkOutcome, OvertimeError> {
        let targets = if employee_ids.is_empty() {
            self.store.employee_ids()?
        } else {
            employee_ids.to_vec()
        };

        let outcome = self.runner.run(period, &targets, |employee_id| {
            self.compute_recap(employee_id, period, recapped_by)
        });

        info!(
            %period,
            total = outcome.total,
            succeeded = outcome.succeeded_count(),
            failed = outcome.failed_count(),
            "Bulk recap finished"
        );
        Ok(outcome)
    }

    fn load_overtime_request(
        &self,
        request_id: OvertimeRequestId,
    ) -> Result<OvertimeRequest, OvertimeError> {
        self.store
            .overtime_request(request_id)
            .map_err(|e| match e {
                StoreError::OvertimeRequestNotFound(id) => OvertimeError::RequestNotFound(id),
                other => other.into(),
            })
    }

    fn validate_against_store(
        &self,
        employee_id: EmployeeId,
        entries: &[OvertimeEntry],
        excluding: Option<OvertimeRequestId>,
    ) -> Result<ValidationResult, OvertimeError> {
        self.store.employee_policy(employee_id)?;
        let existing_dates = self
            .store
            .pending_or_approved_overtime_dates(employee_id, excluding)?;
        let last_recap_date = self.store.last_recap_date(employee_id)?;
        let ctx = ValidationContext {
            existing_dates: &existing_dates,
            last_recap_date,
            today: self.today(),
            policy: &self.policy,
        };
        Ok(validate_entries(entries, &ctx))
    }
}
