//! Overtime request routes.

use accrual_core::overtime::{
    ApprovalDecision, OvertimeBalance, OvertimeEntry, OvertimeRequest, ValidationResult,
};
use accrual_shared::types::{EmployeeId, OvertimeRequestId};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use super::blocking;
use crate::{ApiError, AppState};

/// Creates the overtime routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/employees/{employee_id}/overtime/validate",
            post(validate_entries),
        )
        .route(
            "/employees/{employee_id}/overtime-requests",
            post(submit_request),
        )
        .route(
            "/employees/{employee_id}/overtime-balance",
            get(get_balance),
        )
        .route("/overtime-requests/{request_id}", get(get_request))
        .route(
            "/overtime-requests/{request_id}/decision",
            post(decide_request),
        )
        .route(
            "/overtime-requests/{request_id}/resubmit",
            post(resubmit_request),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Entries to check without submitting.
#[derive(Debug, Deserialize)]
pub struct ValidateEntriesRequest {
    /// Proposed entries.
    pub entries: Vec<OvertimeEntry>,
}

/// A new or revised batch of entries.
#[derive(Debug, Deserialize)]
pub struct SubmitEntriesRequest {
    /// Entries to submit.
    pub entries: Vec<OvertimeEntry>,
    /// Acknowledges entries dated on regular workdays.
    #[serde(default)]
    pub confirm_weekday: bool,
}

/// A resubmission after a revision request.
#[derive(Debug, Deserialize)]
pub struct ResubmitRequest {
    /// The employee resubmitting; must own the request.
    pub actor_id: EmployeeId,
    /// Revised entries.
    pub entries: Vec<OvertimeEntry>,
    /// Acknowledges entries dated on regular workdays.
    #[serde(default)]
    pub confirm_weekday: bool,
}

/// An approver decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// The deciding approver.
    pub approver_id: EmployeeId,
    /// Approve, reject or send back.
    pub decision: ApprovalDecision,
    /// Required unless approving.
    #[serde(default)]
    pub comment: Option<String>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /employees/{employee_id}/overtime/validate
async fn validate_entries(
    State(state): State<AppState>,
    Path(employee_id): Path<EmployeeId>,
    Json(request): Json<ValidateEntriesRequest>,
) -> Result<Json<ValidationResult>, ApiError> {
    let result = blocking(&state, move |service| {
        service.validate_overtime_entries(employee_id, &request.entries)
    })
    .await?;
    Ok(Json(result))
}

/// POST /employees/{employee_id}/overtime-requests
async fn submit_request(
    State(state): State<AppState>,
    Path(employee_id): Path<EmployeeId>,
    Json(request): Json<SubmitEntriesRequest>,
) -> Result<(StatusCode, Json<OvertimeRequest>), ApiError> {
    let created = blocking(&state, move |service| {
        service.submit_overtime_request(employee_id, request.entries, request.confirm_weekday)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /employees/{employee_id}/overtime-balance
async fn get_balance(
    State(state): State<AppState>,
    Path(employee_id): Path<EmployeeId>,
) -> Result<Json<OvertimeBalance>, ApiError> {
    let balance = blocking(&state, move |service| service.overtime_balance(employee_id)).await?;
    Ok(Json(balance))
}

/// GET /overtime-requests/{request_id}
async fn get_request(
    State(state): State<AppState>,
    Path(request_id): Path<OvertimeRequestId>,
) -> Result<Json<OvertimeRequest>, ApiError> {
    let request = blocking(&state, move |service| service.overtime_request(request_id)).await?;
    Ok(Json(request))
}

/// POST /overtime-requests/{request_id}/decision
async fn decide_request(
    State(state): State<AppState>,
    Path(request_id): Path<OvertimeRequestId>,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<OvertimeRequest>, ApiError> {
    let decided = blocking(&state, move |service| {
        service.decide_overtime_request(
            request_id,
            request.approver_id,
            request.decision,
            request.comment,
        )
    })
    .await?;
    Ok(Json(decided))
}

/// POST /overtime-requests/{request_id}/resubmit
async fn resubmit_request(
    State(state): State<AppState>,
    Path(request_id): Path<OvertimeRequestId>,
    Json(request): Json<ResubmitRequest>,
) -> Result<Json<OvertimeRequest>, ApiError> {
    let resubmitted = blocking(&state, move |service| {
        service.resubmit_overtime_request(
            request_id,
            request.actor_id,
            request.entries,
            request.confirm_weekday,
        )
    })
    .await?;
    Ok(Json(resubmitted))
}
