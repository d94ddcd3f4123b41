//! Per-employee, per-year leave balance ledger.

use accrual_shared::types::EmployeeId;
use serde::{Deserialize, Serialize};

use super::error::LeaveError;
use super::types::LeaveBucket;

/// A change to a [`LeaveBalance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BalanceMutation {
    /// Consume days on approval.
    Debit {
        /// Bucket to consume from.
        bucket: LeaveBucket,
        /// Days consumed.
        days: i32,
    },
    /// Give back previously debited days on cancellation.
    Credit {
        /// Bucket to restore.
        bucket: LeaveBucket,
        /// Days restored.
        days: i32,
    },
    /// Grant TOIL days produced by a recap.
    EarnToil {
        /// Days granted.
        days: i32,
    },
}

/// Leave balance for one employee and year.
///
/// `annual_remaining == annual_quota - annual_used` and
/// `toil_remaining == toil_earned - toil_used` hold after every mutation,
/// and no remaining value goes below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Owner.
    pub employee_id: EmployeeId,
    /// Calendar year.
    pub year: i32,
    /// Annual leave days granted.
    pub annual_quota: i32,
    /// Annual leave days consumed by approved requests.
    pub annual_used: i32,
    /// `annual_quota - annual_used`.
    pub annual_remaining: i32,
    /// TOIL days credited by recaps.
    pub toil_earned: i32,
    /// TOIL days consumed by approved requests.
    pub toil_used: i32,
    /// `toil_earned - toil_used`.
    pub toil_remaining: i32,
}

impl LeaveBalance {
    /// A fresh balance with nothing used and no TOIL.
    #[must_use]
    pub const fn new(employee_id: EmployeeId, year: i32, annual_quota: i32) -> Self {
        Self {
            employee_id,
            year,
            annual_quota,
            annual_used: 0,
            annual_remaining: annual_quota,
            toil_earned: 0,
            toil_used: 0,
            toil_remaining: 0,
        }
    }

    /// Remaining days in `bucket`.
    #[must_use]
    pub const fn remaining(&self, bucket: LeaveBucket) -> i32 {
        match bucket {
            LeaveBucket::Annual => self.annual_remaining,
            LeaveBucket::Toil => self.toil_remaining,
        }
    }

    /// Verifies the derived fields and floors.
    ///
    /// # Errors
    ///
    /// Returns `BalanceInvariant` describing the first broken rule.
    pub fn check_invariants(&self) -> Result<(), LeaveError> {
        let broken = if self.annual_remaining != self.annual_quota - self.annual_used {
            Some("annual_remaining != annual_quota - annual_used")
        } else if self.toil_remaining != self.toil_earned - self.toil_used {
            Some("toil_remaining != toil_earned - toil_used")
        } else if self.annual_used < 0 || self.toil_used < 0 || self.toil_earned < 0 {
            Some("negative counter")
        } else if self.annual_remaining < 0 || self.toil_remaining < 0 {
            Some("negative remaining")
        } else {
            None
        };
        match broken {
            Some(rule) => Err(LeaveError::BalanceInvariant(rule.to_string())),
            None => Ok(()),
        }
    }

    /// Returns the balance after `mutation`, leaving `self` untouched.
    ///
    /// # Errors
    ///
    /// * `InvalidDays` if the mutation carries a non-positive day count
    /// * `InsufficientBalance` if a debit exceeds the bucket's remaining days
    /// * `BalanceInvariant` if the result breaks an invariant
    pub fn apply(&self, mutation: BalanceMutation) -> Result<Self, LeaveError> {
        let mut next = *self;
        match mutation {
            BalanceMutation::Debit { bucket, days } => {
                ensure_positive(days)?;
                let available = self.remaining(bucket);
                if days > available {
                    return Err(LeaveError::InsufficientBalance {
                        bucket,
                        requested: days,
                        available,
                    });
                }
                match bucket {
                    LeaveBucket::Annual => next.annual_used += days,
                    LeaveBucket::Toil => next.toil_used += days,
                }
            }
            BalanceMutation::Credit { bucket, days } => {
                ensure_positive(days)?;
                match bucket {
                    LeaveBucket::Annual => next.annual_used -= days,
                    LeaveBucket::Toil => next.toil_used -= days,
                }
            }
            BalanceMutation::EarnToil { days } => {
                ensure_positive(days)?;
                next.toil_earned += days;
            }
        }
        next.annual_remaining = next.annual_quota - next.annual_used;
        next.toil_remaining = next.toil_earned - next.toil_used;
        next.check_invariants()?;
        Ok(next)
    }
}

fn ensure_positive(days: i32) -> Result<(), LeaveError> {
    if days > 0 {
        Ok(())
    } else {
        Err(LeaveError::InvalidDays(days))
    }
}
