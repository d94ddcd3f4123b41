//! Engine entry points.
//!
//! [`AccrualService`] combines the pure modules with a store, a clock and
//! the policy. Every read-check-write sequence for one employee runs under
//! that employee's store lock; different employees never wait on each other.

mod leave;
mod overtime;

use std::sync::Arc;

use chrono::NaiveDate;

use crate::bulk::BulkRecapRunner;
use crate::policy::{Clock, Policy};
use crate::store::AccrualStore;

pub use leave::CommittedLeaveTransition;

/// Accrual engine bound to a store and a clock.
pub struct AccrualService<S, C> {
    store: Arc<S>,
    clock: C,
    policy: Policy,
    runner: BulkRecapRunner,
}

impl<S, C> std::fmt::Debug for AccrualService<S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccrualService")
            .field("policy", &self.policy)
            .field("runner", &self.runner)
            .finish_non_exhaustive()
    }
}

impl<S, C> AccrualService<S, C>
where
    S: AccrualStore,
    C: Clock,
{
    /// Creates a service.
    pub fn new(store: Arc<S>, clock: C, policy: Policy, runner: BulkRecapRunner) -> Self {
        Self {
            store,
            clock,
            policy,
            runner,
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The policy in force.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Today in the policy timezone.
    pub fn today(&self) -> NaiveDate {
        self.policy.today(self.clock.now())
    }
}
