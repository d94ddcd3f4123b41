//! Overtime entry validation.
//!
//! A pure check of a proposed batch against policy and the employee's
//! existing claims. Every violation is collected; nothing short-circuits.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;

use crate::policy::Policy;

use super::types::OvertimeEntry;

/// Which part of the submission an issue points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryField {
    /// The batch as a whole.
    Entries,
    /// An entry's date.
    Date,
    /// An entry's hours.
    Hours,
    /// An entry's description.
    Description,
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// The batch is empty.
    #[error("At least one entry is required")]
    NoEntries,

    /// The batch has too many entries.
    #[error("At most {max} entries are allowed, got {got}")]
    TooManyEntries {
        /// Allowed maximum.
        max: usize,
        /// Submitted count.
        got: usize,
    },

    /// Hours outside the allowed range.
    #[error("Hours must be between {min} and {max}")]
    HoursOutOfRange {
        /// Minimum hours.
        min: String,
        /// Maximum hours.
        max: String,
    },

    /// Hours not on the half-hour grid.
    #[error("Hours must be in half-hour steps")]
    HoursNotHalfHour,

    /// Description missing.
    #[error("Description is required")]
    EmptyDescription,

    /// Date earlier than the submission window or the last recap.
    #[error("Date must be on or after {min_date}")]
    DateTooEarly {
        /// Earliest accepted date.
        min_date: NaiveDate,
    },

    /// Date after today.
    #[error("Date cannot be after {today}")]
    DateInFuture {
        /// Today's date.
        today: NaiveDate,
    },

    /// Same date twice in the batch.
    #[error("Date {date} already appears in entry {first_index}")]
    DuplicateDateInBatch {
        /// Repeated date.
        date: NaiveDate,
        /// Index of the first entry with that date.
        first_index: usize,
    },

    /// Date already claimed by another pending or approved request.
    #[error("Overtime for {date} was already submitted")]
    DateAlreadyClaimed {
        /// Claimed date.
        date: NaiveDate,
    },
}

impl ValidationIssue {
    /// Returns the machine-readable code of the issue.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoEntries => "no_entries",
            Self::TooManyEntries { .. } => "too_many_entries",
            Self::HoursOutOfRange { .. } => "hours_out_of_range",
            Self::HoursNotHalfHour => "hours_not_half_hour",
            Self::EmptyDescription => "empty_description",
            Self::DateTooEarly { .. } => "date_too_early",
            Self::DateInFuture { .. } => "date_in_future",
            Self::DuplicateDateInBatch { .. } => "duplicate_date_in_batch",
            Self::DateAlreadyClaimed { .. } => "date_already_claimed",
        }
    }

    /// Returns true for issues caused by another entry or request
    /// rather than the entry itself.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateDateInBatch { .. } | Self::DateAlreadyClaimed { .. }
        )
    }
}

/// A violation tied to an entry (or to the batch when `entry_index` is `None`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Index into the submitted entries.
    pub entry_index: Option<usize>,
    /// Offending field.
    pub field: EntryField,
    /// What is wrong.
    pub issue: ValidationIssue,
}

/// Advisory raised for a date that needs the submitter's confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldWarning {
    /// Index into the submitted entries.
    pub entry_index: usize,
    /// The date that triggered the warning.
    pub date: NaiveDate,
    /// The weekday of `date`.
    pub weekday: String,
}

/// Outcome of validating a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// True when there are no errors (warnings do not count).
    pub ok: bool,
    /// Every violation found.
    pub errors: Vec<FieldError>,
    /// Weekday advisories.
    pub warnings: Vec<FieldWarning>,
    /// Earliest accepted entry date.
    pub min_date: NaiveDate,
    /// Latest accepted entry date.
    pub max_date: NaiveDate,
}

impl ValidationResult {
    /// Returns true if the submitter must confirm before the batch is accepted.
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Snapshot of the state the validator checks against.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Dates already in the employee's pending or approved requests.
    pub existing_dates: &'a BTreeSet<NaiveDate>,
    /// Last day of the employee's most recent recap.
    pub last_recap_date: Option<NaiveDate>,
    /// Today in the policy timezone.
    pub today: NaiveDate,
    /// Policy constants.
    pub policy: &'a Policy,
}

/// Earliest date an entry may carry: `max(today - window, last_recap + 1)`.
#[must_use]
pub fn min_entry_date(
    today: NaiveDate,
    window_days: i64,
    last_recap_date: Option<NaiveDate>,
) -> NaiveDate {
    let window_start = today - Duration::days(window_days);
    match last_recap_date.and_then(|d| d.succ_opt()) {
        Some(after_recap) if after_recap > window_start => after_recap,
        _ => window_start,
    }
}

/// Validates a batch of overtime entries.
#[must_use]
pub fn validate_entries(entries: &[OvertimeEntry], ctx: &ValidationContext<'_>) -> ValidationResult {
    let policy = ctx.policy;
    let min_date = min_entry_date(ctx.today, policy.submission_window_days, ctx.last_recap_date);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if entries.is_empty() {
        errors.push(FieldError {
            entry_index: None,
            field: EntryField::Entries,
            issue: ValidationIssue::NoEntries,
        });
    } else if entries.len() > policy.max_entries_per_request {
        errors.push(FieldError {
            entry_index: None,
            field: EntryField::Entries,
            issue: ValidationIssue::TooManyEntries {
                max: policy.max_entries_per_request,
                got: entries.len(),
            },
        });
    }

    let mut first_seen: HashMap<NaiveDate, usize> = HashMap::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let mut push = |field, issue| {
            errors.push(FieldError {
                entry_index: Some(index),
                field,
                issue,
            });
        };

        if entry.hours < policy.min_hours_per_entry || entry.hours > policy.max_hours_per_day {
            push(
                EntryField::Hours,
                ValidationIssue::HoursOutOfRange {
                    min: policy.min_hours_per_entry.to_string(),
                    max: policy.max_hours_per_day.to_string(),
                },
            );
        } else if !entry.hours.is_half_hour_aligned() {
            push(EntryField::Hours, ValidationIssue::HoursNotHalfHour);
        }

        if entry.description.trim().is_empty() {
            push(EntryField::Description, ValidationIssue::EmptyDescription);
        }

        if entry.date < min_date {
            push(EntryField::Date, ValidationIssue::DateTooEarly { min_date });
        } else if entry.date > ctx.today {
            push(
                EntryField::Date,
                ValidationIssue::DateInFuture { today: ctx.today },
            );
        }

        if let Some(&first_index) = first_seen.get(&entry.date) {
            push(
                EntryField::Date,
                ValidationIssue::DuplicateDateInBatch {
                    date: entry.date,
                    first_index,
                },
            );
        } else {
            first_seen.insert(entry.date, index);
        }

        if ctx.existing_dates.contains(&entry.date) {
            push(
                EntryField::Date,
                ValidationIssue::DateAlreadyClaimed { date: entry.date },
            );
        }

        if is_regular_workday(entry.date, policy) {
            warnings.push(FieldWarning {
                entry_index: index,
                date: entry.date,
                weekday: entry.date.weekday().to_string(),
            });
        }
    }

    ValidationResult {
        ok: errors.is_empty(),
        errors,
        warnings,
        min_date,
        max_date: ctx.today,
    }
}

fn is_regular_workday(date: NaiveDate, policy: &Policy) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !policy.is_holiday(date)
}
