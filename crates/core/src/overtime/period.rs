//! Monthly recap periods.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::error::OvertimeError;

/// A calendar month that overtime is reconciled over.
///
/// Ordered chronologically (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecapPeriod {
    /// Calendar year.
    pub year: i32,
    /// Month number (1-12).
    pub month: u32,
}

impl RecapPeriod {
    /// Creates a period, rejecting impossible months.
    pub fn new(year: i32, month: u32) -> Result<Self, OvertimeError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(OvertimeError::InvalidPeriod { year, month });
        }
        Ok(Self { year, month })
    }

    /// Returns the period containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or(NaiveDate::MAX)
    }

    /// The following month.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Returns true if `date` falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// A period is closed once its last day is strictly before `today`.
    #[must_use]
    pub fn is_closed(self, today: NaiveDate) -> bool {
        self.last_day() < today
    }
}

impl fmt::Display for RecapPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
