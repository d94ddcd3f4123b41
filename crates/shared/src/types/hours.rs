//! Hour quantities with half-hour granularity.
//!
//! CRITICAL: Never use floating-point for overtime hours.
//! This type wraps `rust_decimal::Decimal` so that sums, caps and
//! carryover arithmetic stay exact.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A quantity of hours.
///
/// Overtime is recorded in half-hour steps; `is_half_hour_aligned`
/// reports whether a value sits on that grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Hours(Decimal);

impl Hours {
    /// Zero hours.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wraps a decimal hour amount.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Creates a value from whole hours.
    #[must_use]
    pub fn whole(hours: i64) -> Self {
        Self(Decimal::from(hours))
    }

    /// Creates a value from a count of half hours (`3` is 1.5 hours).
    #[must_use]
    pub fn from_halves(halves: i64) -> Self {
        Self(Decimal::new(halves * 5, 1))
    }

    /// Returns the inner decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns true if the value is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is negative.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true if the value is a whole multiple of half an hour.
    #[must_use]
    pub fn is_half_hour_aligned(self) -> bool {
        (self.0 * Decimal::TWO).fract().is_zero()
    }

    /// Subtracts `other`, clamping at zero.
    #[must_use]
    pub fn saturating_sub(self, other: Self) -> Self {
        if other >= self {
            Self::ZERO
        } else {
            Self(self.0 - other.0)
        }
    }
}

impl Add for Hours {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Hours {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Hours {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Hours {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
