//! Property-based tests for the recap calculator.

use accrual_shared::types::Hours;
use proptest::prelude::*;

use super::recap::RecapCalculator;

/// Strategy for half-hour aligned hour totals up to 400 hours.
fn arb_hours() -> impl Strategy<Value = Hours> {
    (0i64..=800).prop_map(Hours::from_halves)
}

/// Strategy for a payable cap between 0 and 120 hours.
fn arb_cap() -> impl Strategy<Value = Hours> {
    (0i64..=240).prop_map(Hours::from_halves)
}

/// Strategy for a TOIL ratio between 0.5 and 12 hours.
fn arb_ratio() -> impl Strategy<Value = Hours> {
    (1i64..=24).prop_map(Hours::from_halves)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// paid + excess == total, exactly.
    #[test]
    fn prop_paid_plus_excess_is_total(
        approved in arb_hours(),
        carryover in arb_hours(),
        cap in arb_cap(),
        ratio in arb_ratio(),
    ) {
        let r = RecapCalculator::calculate(approved, carryover, cap, ratio).unwrap();
        prop_assert_eq!(r.total_hours, approved + carryover);
        prop_assert_eq!(r.paid_hours + r.excess_hours, r.total_hours);
        prop_assert!(r.paid_hours <= cap);
    }

    /// total_toil + remaining == excess, and remaining is below one TOIL day.
    #[test]
    fn prop_toil_plus_remaining_is_excess(
        approved in arb_hours(),
        carryover in arb_hours(),
        cap in arb_cap(),
        ratio in arb_ratio(),
    ) {
        let r = RecapCalculator::calculate(approved, carryover, cap, ratio).unwrap();
        prop_assert_eq!(r.total_toil_hours + r.remaining_hours, r.excess_hours);
        prop_assert!(r.remaining_hours < ratio);
        prop_assert!(!r.remaining_hours.is_negative());
        prop_assert!(r.toil_days_created >= 0);
    }

    /// Outputs stay on the half-hour grid when inputs do and the ratio is whole.
    #[test]
    fn prop_results_stay_half_hour_aligned(
        approved in arb_hours(),
        carryover in arb_hours(),
        cap in (0i64..=120).prop_map(Hours::whole),
        ratio in (1i64..=12).prop_map(Hours::whole),
    ) {
        let r = RecapCalculator::calculate(approved, carryover, cap, ratio).unwrap();
        prop_assert!(r.paid_hours.is_half_hour_aligned());
        prop_assert!(r.excess_hours.is_half_hour_aligned());
        prop_assert!(r.remaining_hours.is_half_hour_aligned());
    }

    /// Same inputs, same output.
    #[test]
    fn prop_calculation_is_idempotent(
        approved in arb_hours(),
        carryover in arb_hours(),
        cap in arb_cap(),
        ratio in arb_ratio(),
    ) {
        let first = RecapCalculator::calculate(approved, carryover, cap, ratio).unwrap();
        let second = RecapCalculator::calculate(approved, carryover, cap, ratio).unwrap();
        prop_assert_eq!(first, second);
    }
}
