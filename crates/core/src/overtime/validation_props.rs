//! Property-based tests for overtime entry validation.

use std::collections::BTreeSet;

use accrual_shared::types::Hours;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use crate::policy::Policy;

use super::types::OvertimeEntry;
use super::validation::{ValidationContext, ValidationIssue, min_entry_date, validate_entries};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

/// Strategy for an entry inside the submission window with valid hours.
fn valid_entry() -> impl Strategy<Value = OvertimeEntry> {
    (0i64..=7, 1i64..=24).prop_map(|(back, halves)| OvertimeEntry {
        date: today() - Duration::days(back),
        hours: Hours::from_halves(halves),
        description: "support".to_string(),
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every entry produces at most one error per field, and `ok` mirrors `errors`.
    #[test]
    fn prop_ok_iff_no_errors(entries in prop::collection::vec(valid_entry(), 0..8)) {
        let policy = Policy::default();
        let existing = BTreeSet::new();
        let ctx = ValidationContext {
            existing_dates: &existing,
            last_recap_date: None,
            today: today(),
            policy: &policy,
        };
        let result = validate_entries(&entries, &ctx);
        prop_assert_eq!(result.ok, result.errors.is_empty());
        prop_assert!(result.warnings.len() <= entries.len());
    }

    /// A batch of distinct in-window dates with valid hours is accepted.
    #[test]
    fn prop_distinct_valid_batch_accepted(
        days in prop::collection::btree_set(0i64..=7, 1..=5),
        halves in 1i64..=24,
    ) {
        let policy = Policy::default();
        let existing = BTreeSet::new();
        let ctx = ValidationContext {
            existing_dates: &existing,
            last_recap_date: None,
            today: today(),
            policy: &policy,
        };
        let entries: Vec<_> = days
            .iter()
            .map(|back| OvertimeEntry {
                date: today() - Duration::days(*back),
                hours: Hours::from_halves(halves),
                description: "release".to_string(),
            })
            .collect();
        let result = validate_entries(&entries, &ctx);
        prop_assert!(result.ok, "unexpected errors: {:?}", result.errors);
    }

    /// Any date already claimed elsewhere is reported as a conflict.
    #[test]
    fn prop_claimed_date_is_conflict(back in 0i64..=7) {
        let policy = Policy::default();
        let date = today() - Duration::days(back);
        let existing: BTreeSet<_> = [date].into_iter().collect();
        let ctx = ValidationContext {
            existing_dates: &existing,
            last_recap_date: None,
            today: today(),
            policy: &policy,
        };
        let entries = vec![OvertimeEntry {
            date,
            hours: Hours::whole(2),
            description: "on-call".to_string(),
        }];
        let result = validate_entries(&entries, &ctx);
        prop_assert!(!result.ok);
        let expected = ValidationIssue::DateAlreadyClaimed { date };
        prop_assert!(result.errors.iter().any(|e| e.issue == expected));
        prop_assert!(result.errors.iter().all(|e| e.issue.is_conflict()));
    }

    /// The lower bound never precedes the window start nor the day after the last recap.
    #[test]
    fn prop_min_date_is_max_of_bounds(window in 0i64..=30, recap_back in 0i64..=60) {
        let last_recap = today() - Duration::days(recap_back);
        let min = min_entry_date(today(), window, Some(last_recap));
        prop_assert!(min >= today() - Duration::days(window));
        prop_assert!(min > last_recap);
    }
}
