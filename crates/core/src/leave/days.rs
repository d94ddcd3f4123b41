//! Leave duration counting.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::policy::Policy;

use super::types::LeaveType;

/// Mon-Fri dates in `[start, end]` that are not public holidays.
///
/// Returns 0 when `end < start`.
#[must_use]
pub fn working_days(start: NaiveDate, end: NaiveDate, policy: &Policy) -> i32 {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) && !policy.is_holiday(*d))
        .fold(0, |count, _| count + 1)
}

/// Effective end date and day count for a request.
///
/// Fixed-duration types run for their fixed length in calendar days from
/// `start`, whatever `end` was given.
#[must_use]
pub fn leave_span(
    leave_type: LeaveType,
    start: NaiveDate,
    end: NaiveDate,
    policy: &Policy,
) -> (NaiveDate, i32) {
    match leave_type.fixed_days() {
        Some(days) => (start + Duration::days(i64::from(days - 1)), days),
        None => (end, working_days(start, end, policy)),
    }
}
