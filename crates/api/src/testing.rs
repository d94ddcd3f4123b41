//! Router fixtures for handler tests.

use std::sync::Arc;
use std::time::Duration;

use accrual_core::AccrualService;
use accrual_core::bulk::BulkRecapRunner;
use accrual_core::policy::{Clock, FixedClock, Policy};
use accrual_db::{EmployeeRecord, MemoryStore};
use accrual_shared::config::BulkConfig;
use accrual_shared::types::EmployeeId;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use chrono::{NaiveDate, TimeZone, Utc};
use http_body_util::BodyExt;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

use crate::{AppState, create_router};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub manager: EmployeeId,
}

impl TestApp {
    /// An app whose clock reads 09:00 Asia/Jakarta on `day`.
    pub fn at(day: NaiveDate) -> Self {
        let store = Arc::new(MemoryStore::new(12));
        let clock = Arc::new(FixedClock::new(morning(day)));
        let runner = BulkRecapRunner::new(&BulkConfig {
            workers: 2,
            max_attempts: 1,
            backoff_ms: 1,
        })
        .unwrap();
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let service = AccrualService::new(Arc::clone(&store), dyn_clock, Policy::default(), runner);
        let router = create_router(AppState::new(service), Duration::from_secs(5));

        let manager = EmployeeRecord::new("Manager", dec!(300000));
        let manager_id = manager.id;
        store.register_employee(manager);

        Self {
            router,
            store,
            clock,
            manager: manager_id,
        }
    }

    pub fn employee(&self, name: &str) -> EmployeeId {
        let record = EmployeeRecord::new(name, dec!(200000));
        let id = record.id;
        self.store.register_employee(record);
        id
    }

    pub fn set_day(&self, day: NaiveDate) {
        self.clock.set(morning(day));
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Body::empty()).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Body::from(body.to_string()))
            .await
    }

    async fn send(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(body)
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn morning(day: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(2, 0, 0).unwrap())
}
