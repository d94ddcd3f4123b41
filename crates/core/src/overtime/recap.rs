//! Monthly recap calculation.
//!
//! Splits a period's overtime into paid hours, TOIL days and carryover.
//! Everything here is a pure function of its arguments, so a recap can be
//! recomputed safely on retry.

use accrual_shared::types::Hours;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::policy::{AccessTier, EmployeePolicy, Policy};

use super::error::OvertimeError;

/// Split produced by [`RecapCalculator::calculate`].
///
/// Always satisfies `paid + excess == total` and
/// `total_toil + remaining == excess`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecapResult {
    /// Approved hours plus carryover.
    pub total_hours: Hours,
    /// `min(total, cap)`.
    pub paid_hours: Hours,
    /// `max(0, total - cap)`.
    pub excess_hours: Hours,
    /// Carryover that went into `total_hours`.
    pub carryover_hours: Hours,
    /// `toil_days_created * ratio`.
    pub total_toil_hours: Hours,
    /// `floor(excess / ratio)`.
    pub toil_days_created: i32,
    /// `excess - total_toil`, rolled into the next recap.
    pub remaining_hours: Hours,
}

/// Stateless recap calculator.
pub struct RecapCalculator;

impl RecapCalculator {
    /// Computes the paid / TOIL / carryover split.
    ///
    /// # Errors
    ///
    /// * `NegativeHours` if either hour input is negative
    /// * `InvalidPolicy` if the cap is negative or the ratio is not positive
    pub fn calculate(
        approved_hours: Hours,
        carryover_hours: Hours,
        payable_cap_hours: Hours,
        toil_hour_ratio: Hours,
    ) -> Result<RecapResult, OvertimeError> {
        if approved_hours.is_negative() || carryover_hours.is_negative() {
            return Err(OvertimeError::NegativeHours);
        }
        if payable_cap_hours.is_negative() {
            return Err(OvertimeError::InvalidPolicy(
                "payable cap must not be negative".to_string(),
            ));
        }
        if toil_hour_ratio <= Hours::ZERO {
            return Err(OvertimeError::InvalidPolicy(
                "TOIL hour ratio must be positive".to_string(),
            ));
        }

        let total_hours = approved_hours + carryover_hours;
        let paid_hours = total_hours.min(payable_cap_hours);
        let excess_hours = total_hours.saturating_sub(payable_cap_hours);

        let days = (excess_hours.value() / toil_hour_ratio.value()).floor();
        let toil_days_created = days
            .to_i32()
            .ok_or_else(|| OvertimeError::InvalidPolicy(format!("{days} TOIL days overflow")))?;
        let total_toil_hours = Hours::new(days * toil_hour_ratio.value());
        let remaining_hours = excess_hours - total_toil_hours;

        Ok(RecapResult {
            total_hours,
            paid_hours,
            excess_hours,
            carryover_hours,
            total_toil_hours,
            toil_days_created,
            remaining_hours,
        })
    }

    /// Same as [`calculate`](Self::calculate) with the policy's cap and ratio.
    pub fn calculate_with_policy(
        approved_hours: Hours,
        carryover_hours: Hours,
        policy: &Policy,
    ) -> Result<RecapResult, OvertimeError> {
        Self::calculate(
            approved_hours,
            carryover_hours,
            policy.payable_cap_hours,
            policy.toil_hour_ratio,
        )
    }

    /// Cash owed for `paid_hours`, rounded to two decimal places.
    ///
    /// Standard tier: `paid * (overtime_rate / standard_day_hours)`.
    /// Privileged tier: `paid * privileged_hourly_base`.
    #[must_use]
    pub fn payment(paid_hours: Hours, employee: &EmployeePolicy, policy: &Policy) -> Decimal {
        let hourly = match employee.access_tier {
            AccessTier::Privileged => policy.privileged_hourly_base,
            AccessTier::Standard => employee.overtime_rate / policy.standard_day_hours,
        };
        (paid_hours.value() * hourly).round_dp(2)
    }
}
