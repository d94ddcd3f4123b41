//! Recap routes: single-employee and bulk.

use accrual_core::bulk::BulkOutcome;
use accrual_core::overtime::{OvertimeRecap, RecapPeriod};
use accrual_shared::types::EmployeeId;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use serde::Deserialize;
use tracing::info;

use super::blocking;
use crate::{ApiError, AppState};

/// Creates the recap routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/employees/{employee_id}/recaps/{year}/{month}",
            post(compute_recap),
        )
        .route("/recaps/{year}/{month}/bulk", post(run_bulk))
}

/// Request body for a single recap.
#[derive(Debug, Deserialize)]
pub struct RecapRequest {
    /// Who runs the recap.
    pub recapped_by: EmployeeId,
}

/// Request body for a bulk recap.
#[derive(Debug, Deserialize)]
pub struct BulkRecapRequest {
    /// Who runs the recap.
    pub recapped_by: EmployeeId,
    /// Employees to recap; every employee when empty.
    #[serde(default)]
    pub employee_ids: Vec<EmployeeId>,
}

/// POST /employees/{employee_id}/recaps/{year}/{month}
async fn compute_recap(
    State(state): State<AppState>,
    Path((employee_id, year, month)): Path<(EmployeeId, i32, u32)>,
    Json(request): Json<RecapRequest>,
) -> Result<(StatusCode, Json<OvertimeRecap>), ApiError> {
    let period = RecapPeriod::new(year, month)?;
    let recap = blocking(&state, move |service| {
        service.compute_recap(employee_id, period, request.recapped_by)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(recap)))
}

/// POST /recaps/{year}/{month}/bulk
///
/// Per-employee failures are part of a 200 response.
async fn run_bulk(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
    Json(request): Json<BulkRecapRequest>,
) -> Result<Json<BulkOutcome>, ApiError> {
    let period = RecapPeriod::new(year, month)?;
    let outcome = blocking(&state, move |service| {
        service.run_bulk_recap(period, &request.employee_ids, request.recapped_by)
    })
    .await?;
    if outcome.is_partial() {
        info!(%period, failed = outcome.failed_count(), "Bulk recap finished with failures");
    }
    Ok(Json(outcome))
}
