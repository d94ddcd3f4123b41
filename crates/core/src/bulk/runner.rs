//! Bounded, failure-isolating executor for per-employee recaps.

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use accrual_shared::config::BulkConfig;
use accrual_shared::types::EmployeeId;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::{debug, warn};

use crate::overtime::{OvertimeError, OvertimeRecap, RecapPeriod};

use super::types::{BulkFailure, BulkOutcome};

/// Runs one recap job per employee on a dedicated worker pool.
///
/// Jobs for different employees never share state, so a failure in one is
/// recorded and the rest carry on. Transient store failures are retried with
/// a linear backoff.
pub struct BulkRecapRunner {
    pool: ThreadPool,
    max_attempts: u32,
    backoff: Duration,
}

impl std::fmt::Debug for BulkRecapRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkRecapRunner")
            .field("workers", &self.pool.current_num_threads())
            .field("max_attempts", &self.max_attempts)
            .field("backoff", &self.backoff)
            .finish()
    }
}

impl BulkRecapRunner {
    /// Builds the worker pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread pool cannot be created.
    pub fn new(config: &BulkConfig) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers.max(1))
            .thread_name(|i| format!("bulk-recap-{i}"))
            .build()?;
        Ok(Self {
            pool,
            max_attempts: config.max_attempts.max(1),
            backoff: Duration::from_millis(config.backoff_ms),
        })
    }

    /// Runs `job` for every distinct employee and aggregates the results.
    ///
    /// Duplicate ids are dropped, keeping the first occurrence. Results keep
    /// input order whatever order the workers finish in.
    pub fn run<F>(&self, period: RecapPeriod, employee_ids: &[EmployeeId], job: F) -> BulkOutcome
    where
        F: Fn(EmployeeId) -> Result<OvertimeRecap, OvertimeError> + Sync,
    {
        let mut seen = HashSet::with_capacity(employee_ids.len());
        let targets: Vec<EmployeeId> = employee_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        let results: Vec<Result<OvertimeRecap, BulkFailure>> = self.pool.install(|| {
            targets
                .par_iter()
                .map(|&employee_id| self.run_one(period, employee_id, &job))
                .collect()
        });

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for result in results {
            match result {
                Ok(recap) => succeeded.push(recap),
                Err(failure) => failed.push(failure),
            }
        }

        BulkOutcome {
            period,
            total: targets.len(),
            succeeded,
            failed,
        }
    }

    fn run_one<F>(
        &self,
        period: RecapPeriod,
        employee_id: EmployeeId,
        job: &F,
    ) -> Result<OvertimeRecap, BulkFailure>
    where
        F: Fn(EmployeeId) -> Result<OvertimeRecap, OvertimeError>,
    {
        let mut attempt = 1;
        loop {
            match job(employee_id) {
                Ok(recap) => {
                    debug!(%employee_id, %period, attempt, "Bulk recap committed");
                    return Ok(recap);
                }
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    warn!(%employee_id, %period, attempt, error = %e, "Transient recap failure, retrying");
                    thread::sleep(self.backoff * attempt);
                    attempt += 1;
                }
                Err(e) => {
                    warn!(%employee_id, %period, attempt, code = e.error_code(), error = %e, "Bulk recap failed");
                    return Err(BulkFailure::from_error(employee_id, &e, attempt));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overtime::{RecapCalculator, RecapResult};
    use crate::store::StoreError;
    use accrual_shared::types::Hours;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn period() -> RecapPeriod {
        RecapPeriod::new(2026, 3).unwrap()
    }

    fn runner(max_attempts: u32) -> BulkRecapRunner {
        BulkRecapRunner::new(&BulkConfig {
            workers: 3,
            max_attempts,
            backoff_ms: 1,
        })
        .unwrap()
    }

    fn recap_for(employee_id: EmployeeId) -> OvertimeRecap {
        let result: RecapResult = RecapCalculator::calculate(
            Hours::whole(10),
            Hours::ZERO,
            Hours::whole(72),
            Hours::whole(8),
        )
        .unwrap();
        OvertimeRecap::from_result(
            employee_id,
            period(),
            Hours::whole(10),
            &result,
            rust_decimal::Decimal::ZERO,
            Utc::now(),
            EmployeeId::new(),
        )
    }

    #[test]
    fn test_failure_does_not_stop_others() {
        let ids: Vec<_> = (0..3).map(|_| EmployeeId::new()).collect();
        let duplicate = ids[1];
        let outcome = runner(3).run(period(), &ids, |id| {
            if id == duplicate {
                Err(OvertimeError::DuplicateRecap {
                    employee_id: id,
                    period: period(),
                })
            } else {
                Ok(recap_for(id))
            }
        });

        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.succeeded_count(), 2);
        assert_eq!(outcome.failed_count(), 1);
        assert!(outcome.is_partial());
        assert_eq!(outcome.failed[0].employee_id, duplicate);
        assert_eq!(outcome.failed[0].code, "DUPLICATE_RECAP");
        assert_eq!(outcome.failed[0].attempts, 1);
    }

    #[test]
    fn test_results_keep_input_order() {
        let ids: Vec<_> = (0..20).map(|_| EmployeeId::new()).collect();
        let outcome = runner(1).run(period(), &ids, |id| Ok(recap_for(id)));
        let order: Vec<_> = outcome.succeeded.iter().map(|r| r.employee_id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_duplicates_run_once() {
        let id = EmployeeId::new();
        let calls = AtomicU32::new(0);
        let outcome = runner(1).run(period(), &[id, id, id], |id| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(recap_for(id))
        });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.total, 1);
    }

    #[test]
    fn test_transient_failure_is_retried() {
        let id = EmployeeId::new();
        let calls = AtomicU32::new(0);
        let outcome = runner(3).run(period(), &[id], |id| {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(StoreError::Unavailable("busy".into()).into())
            } else {
                Ok(recap_for(id))
            }
        });
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome.succeeded_count(), 1);
    }

    #[test]
    fn test_retries_are_bounded() {
        let id = EmployeeId::new();
        let calls = AtomicU32::new(0);
        let outcome = runner(2).run(period(), &[id], |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::Unavailable("down".into()).into())
        });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(outcome.failed[0].attempts, 2);
        assert_eq!(outcome.failed[0].code, "POLICY_UNAVAILABLE");
    }

    #[test]
    fn test_permanent_failure_is_not_retried() {
        let id = EmployeeId::new();
        let seen = Mutex::new(Vec::new());
        let outcome = runner(5).run(period(), &[id], |id| {
            seen.lock().unwrap().push(id);
            Err(OvertimeError::NoApprovedOvertime {
                employee_id: id,
                period: period(),
            })
        });
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(outcome.failed[0].code, "NO_APPROVED_OVERTIME");
        assert!(!outcome.is_partial());
    }

    #[test]
    fn test_empty_input() {
        let outcome = runner(1).run(period(), &[], |id| Ok(recap_for(id)));
        assert_eq!(outcome.total, 0);
        assert!(outcome.succeeded.is_empty());
        assert!(outcome.failed.is_empty());
    }
}
