//! Property-based tests for the leave balance ledger.

use accrual_shared::types::EmployeeId;
use proptest::prelude::*;

use super::ledger::{BalanceMutation, LeaveBalance};
use super::types::LeaveBucket;

fn bucket_strategy() -> impl Strategy<Value = LeaveBucket> {
    prop_oneof![Just(LeaveBucket::Annual), Just(LeaveBucket::Toil)]
}

fn mutation_strategy() -> impl Strategy<Value = BalanceMutation> {
    prop_oneof![
        (bucket_strategy(), 1i32..=10).prop_map(|(bucket, days)| BalanceMutation::Debit { bucket, days }),
        (bucket_strategy(), 1i32..=10).prop_map(|(bucket, days)| BalanceMutation::Credit { bucket, days }),
        (1i32..=5).prop_map(|days| BalanceMutation::EarnToil { days }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Whatever sequence is attempted, accepted mutations keep the invariants
    /// and rejected ones leave the balance untouched.
    #[test]
    fn prop_invariants_hold_after_every_mutation(
        quota in 0i32..=30,
        mutations in prop::collection::vec(mutation_strategy(), 0..40),
    ) {
        let mut balance = LeaveBalance::new(EmployeeId::new(), 2026, quota);
        for mutation in mutations {
            let before = balance;
            match balance.apply(mutation) {
                Ok(next) => {
                    prop_assert!(next.check_invariants().is_ok());
                    balance = next;
                }
                Err(_) => prop_assert_eq!(balance, before),
            }
            prop_assert!(balance.annual_remaining >= 0);
            prop_assert!(balance.toil_remaining >= 0);
        }
    }

    /// A debit followed by the matching credit restores the balance.
    #[test]
    fn prop_debit_credit_round_trip(
        quota in 1i32..=30,
        earned in 1i32..=10,
        bucket in bucket_strategy(),
        fraction in 1i32..=100,
    ) {
        let start = LeaveBalance::new(EmployeeId::new(), 2026, quota)
            .apply(BalanceMutation::EarnToil { days: earned })
            .unwrap();
        let days = (start.remaining(bucket) * fraction / 100).max(1);
        let debited = start.apply(BalanceMutation::Debit { bucket, days }).unwrap();
        prop_assert_eq!(debited.remaining(bucket), start.remaining(bucket) - days);
        let restored = debited.apply(BalanceMutation::Credit { bucket, days }).unwrap();
        prop_assert_eq!(restored, start);
    }
}
