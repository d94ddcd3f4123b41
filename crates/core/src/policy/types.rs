//! Policy constants and per-employee policy data.

use std::collections::BTreeSet;
use std::fmt;

use accrual_shared::config::{LeaveConfig, PolicyConfig};
use accrual_shared::types::Hours;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a [`Policy`] from configuration.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The configured timezone is not a known IANA name.
    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    /// A numeric constant is outside its usable range.
    #[error("Invalid policy constant {name}: {value}")]
    InvalidConstant {
        /// Constant name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Access tier of an employee, used by the payment override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessTier {
    /// Paid from the employee's own overtime rate.
    #[default]
    Standard,
    /// Paid from the fixed hourly base in [`Policy::privileged_hourly_base`].
    Privileged,
}

impl AccessTier {
    /// Returns the string representation of the tier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Privileged => "privileged",
        }
    }
}

impl fmt::Display for AccessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-employee inputs supplied by the employee directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePolicy {
    /// Daily overtime rate (divided by the standard day length for an hourly figure).
    pub overtime_rate: Decimal,
    /// Access tier.
    #[serde(default)]
    pub access_tier: AccessTier,
}

/// Organisation-wide constants injected into every engine call.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Timezone used to derive "today".
    pub timezone: Tz,
    /// Upper bound for one entry.
    pub max_hours_per_day: Hours,
    /// Lower bound for one entry.
    pub min_hours_per_entry: Hours,
    /// Maximum entries in one request.
    pub max_entries_per_request: usize,
    /// Days an entry may lag behind today.
    pub submission_window_days: i64,
    /// Hours per period eligible for cash payment.
    pub payable_cap_hours: Hours,
    /// Hours that convert into one TOIL day.
    pub toil_hour_ratio: Hours,
    /// Hours in a standard working day.
    pub standard_day_hours: Decimal,
    /// Fixed hourly base for the privileged tier.
    pub privileged_hourly_base: Decimal,
    /// Dates that never count as working days.
    pub public_holidays: BTreeSet<NaiveDate>,
    /// Annual leave quota for a year with no stored balance.
    pub default_annual_quota: i32,
    /// Unpaid leave cap per year.
    pub unpaid_max_days_per_year: i32,
    /// Unpaid leave cap per request.
    pub unpaid_max_consecutive_days: i32,
}

impl Policy {
    /// Builds a policy from the configuration sections.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown timezone or a non-positive divisor.
    pub fn from_config(policy: &PolicyConfig, leave: &LeaveConfig) -> Result<Self, PolicyError> {
        let timezone: Tz = policy
            .timezone
            .parse()
            .map_err(|_| PolicyError::UnknownTimezone(policy.timezone.clone()))?;

        ensure_positive("toil_hour_ratio", policy.toil_hour_ratio)?;
        ensure_positive("standard_day_hours", policy.standard_day_hours)?;
        ensure_positive("max_hours_per_day", policy.max_hours_per_day)?;
        if policy.payable_cap_hours.is_sign_negative() {
            return Err(PolicyError::InvalidConstant {
                name: "payable_cap_hours",
                value: policy.payable_cap_hours.to_string(),
            });
        }
        if policy.max_entries_per_request == 0 {
            return Err(PolicyError::InvalidConstant {
                name: "max_entries_per_request",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            timezone,
            max_hours_per_day: Hours::new(policy.max_hours_per_day),
            min_hours_per_entry: Hours::new(policy.min_hours_per_entry),
            max_entries_per_request: policy.max_entries_per_request,
            submission_window_days: policy.submission_window_days,
            payable_cap_hours: Hours::new(policy.payable_cap_hours),
            toil_hour_ratio: Hours::new(policy.toil_hour_ratio),
            standard_day_hours: policy.standard_day_hours,
            privileged_hourly_base: policy.privileged_hourly_base,
            public_holidays: policy.public_holidays.iter().copied().collect(),
            default_annual_quota: leave.default_annual_quota,
            unpaid_max_days_per_year: leave.unpaid_max_days_per_year,
            unpaid_max_consecutive_days: leave.unpaid_max_consecutive_days,
        })
    }

    /// Returns the local calendar date of `now`.
    #[must_use]
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }

    /// Returns true if `date` is a configured public holiday.
    #[must_use]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.public_holidays.contains(&date)
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Asia::Jakarta,
            max_hours_per_day: Hours::whole(12),
            min_hours_per_entry: Hours::from_halves(1),
            max_entries_per_request: 5,
            submission_window_days: 7,
            payable_cap_hours: Hours::whole(72),
            toil_hour_ratio: Hours::whole(8),
            standard_day_hours: Decimal::from(8),
            privileged_hourly_base: Decimal::from(50_000),
            public_holidays: BTreeSet::new(),
            default_annual_quota: 12,
            unpaid_max_days_per_year: 14,
            unpaid_max_consecutive_days: 5,
        }
    }
}

fn ensure_positive(name: &'static str, value: Decimal) -> Result<(), PolicyError> {
    if value > Decimal::ZERO {
        Ok(())
    } else {
        Err(PolicyError::InvalidConstant {
            name,
            value: value.to_string(),
        })
    }
}
