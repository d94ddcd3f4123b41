//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over [`AccrualService`]
//! - The JSON error envelope
//! - Router construction with tracing, CORS and timeouts

pub mod error;
pub mod routes;

#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Duration;

use accrual_core::AccrualService;
use accrual_core::policy::Clock;
use accrual_db::MemoryStore;
use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// The engine as served over HTTP.
pub type Service = AccrualService<MemoryStore, Arc<dyn Clock>>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Accrual engine.
    pub service: Arc<Service>,
}

impl AppState {
    /// Wraps a service for sharing between handlers.
    pub fn new(service: Service) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
