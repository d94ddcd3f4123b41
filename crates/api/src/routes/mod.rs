//! API route definitions.

use std::sync::Arc;

use accrual_shared::AppError;
use axum::Router;

use crate::{ApiError, AppState, Service};

pub mod health;
pub mod leave;
pub mod overtime;
pub mod recaps;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(overtime::routes())
        .merge(recaps::routes())
        .merge(leave::routes())
}

/// Runs a synchronous engine call off the async runtime.
///
/// Engine calls take per-employee locks and bulk runs sleep between
/// retries, so they never run on a runtime worker.
pub(crate) async fn blocking<T, E, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Service) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || f(&service).map_err(Into::into))
        .await
        .map_err(|e| ApiError::from(AppError::Internal(format!("Engine task failed: {e}"))))?
}
