//! Shared fixtures for store-backed service tests.

#![allow(dead_code)]

use std::sync::Arc;

use accrual_core::AccrualService;
use accrual_core::bulk::BulkRecapRunner;
use accrual_core::overtime::{ApprovalDecision, OvertimeEntry, OvertimeRequest};
use accrual_core::policy::{FixedClock, Policy};
use accrual_db::{EmployeeRecord, MemoryStore};
use accrual_shared::config::BulkConfig;
use accrual_shared::types::{EmployeeId, Hours};
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

pub type Service = AccrualService<MemoryStore, Arc<FixedClock>>;

pub struct Harness {
    pub service: Service,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub manager: EmployeeId,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new(12));
        let clock = Arc::new(FixedClock::new(jakarta_morning(date(2026, 3, 2))));
        let runner = BulkRecapRunner::new(&BulkConfig {
            workers: 4,
            max_attempts: 2,
            backoff_ms: 1,
        })
        .unwrap();
        let service = AccrualService::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            Policy::default(),
            runner,
        );
        let harness = Self {
            service,
            store,
            clock,
            manager: EmployeeId::new(),
        };
        let mut manager = EmployeeRecord::new("Manager", dec!(300000));
        manager.id = harness.manager;
        harness.store.register_employee(manager);
        harness
    }

    /// Registers a standard-tier employee paid 200,000 per overtime day.
    pub fn employee(&self, name: &str) -> EmployeeId {
        let record = EmployeeRecord::new(name, dec!(200000));
        let id = record.id;
        self.store.register_employee(record);
        id
    }

    /// Moves the clock to 09:00 Asia/Jakarta on `day`.
    pub fn at(&self, day: NaiveDate) {
        self.clock.set(jakarta_morning(day));
    }

    /// Submits `entries` (date, half-hours) as one request and approves it.
    pub fn approved_overtime(
        &self,
        employee_id: EmployeeId,
        entries: &[(NaiveDate, i64)],
    ) -> OvertimeRequest {
        let entries = entries
            .iter()
            .map(|(d, halves)| entry(*d, *halves))
            .collect();
        let request = self
            .service
            .submit_overtime_request(employee_id, entries, true)
            .unwrap();
        self.service
            .decide_overtime_request(request.id, self.manager, ApprovalDecision::Approve, None)
            .unwrap()
    }

    /// Approves 80 hours dated in March 2026 for `employee_id`.
    pub fn march_eighty_hours(&self, employee_id: EmployeeId) {
        self.at(date(2026, 3, 8));
        self.approved_overtime(
            employee_id,
            &[
                (date(2026, 3, 1), 20),
                (date(2026, 3, 2), 20),
                (date(2026, 3, 3), 20),
                (date(2026, 3, 4), 20),
                (date(2026, 3, 5), 20),
            ],
        );
        self.at(date(2026, 3, 15));
        self.approved_overtime(
            employee_id,
            &[
                (date(2026, 3, 9), 20),
                (date(2026, 3, 10), 20),
                (date(2026, 3, 11), 20),
            ],
        );
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn jakarta_morning(day: NaiveDate) -> chrono::DateTime<Utc> {
    // 09:00 WIB is 02:00 UTC
    Utc.from_utc_datetime(&day.and_hms_opt(2, 0, 0).unwrap())
}

pub fn entry(day: NaiveDate, halves: i64) -> OvertimeEntry {
    OvertimeEntry {
        date: day,
        hours: Hours::from_halves(halves),
        description: "Production support".to_string(),
    }
}
