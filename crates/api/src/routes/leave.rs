//! Leave request and balance routes.

use accrual_core::CommittedLeaveTransition;
use accrual_core::leave::{LeaveAction, LeaveBalance, LeaveEvent, LeaveRequest, NewLeaveRequest};
use accrual_shared::types::{EmployeeId, LeaveRequestId};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use super::blocking;
use crate::{ApiError, AppState};

/// Creates the leave routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/employees/{employee_id}/leave-balance/{year}",
            get(get_balance),
        )
        .route(
            "/employees/{employee_id}/leave-requests",
            post(submit_request),
        )
        .route("/leave-requests/{request_id}", get(get_request))
        .route(
            "/leave-requests/{request_id}/transition",
            post(transition_request),
        )
        .route("/leave-requests/{request_id}/timeline", get(get_timeline))
}

/// Request body for a transition.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Approver for approve/reject, owner for cancel.
    pub actor_id: EmployeeId,
    /// Approve, reject or cancel.
    pub action: LeaveAction,
    /// Rejection or cancellation reason.
    #[serde(default)]
    pub comment: Option<String>,
}

/// GET /employees/{employee_id}/leave-balance/{year}
async fn get_balance(
    State(state): State<AppState>,
    Path((employee_id, year)): Path<(EmployeeId, i32)>,
) -> Result<Json<LeaveBalance>, ApiError> {
    let balance = blocking(&state, move |service| service.leave_balance(employee_id, year)).await?;
    Ok(Json(balance))
}

/// POST /employees/{employee_id}/leave-requests
async fn submit_request(
    State(state): State<AppState>,
    Path(employee_id): Path<EmployeeId>,
    Json(request): Json<NewLeaveRequest>,
) -> Result<(StatusCode, Json<LeaveRequest>), ApiError> {
    let created = blocking(&state, move |service| {
        service.submit_leave_request(employee_id, request)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /leave-requests/{request_id}
async fn get_request(
    State(state): State<AppState>,
    Path(request_id): Path<LeaveRequestId>,
) -> Result<Json<LeaveRequest>, ApiError> {
    let request = blocking(&state, move |service| service.leave_request(request_id)).await?;
    Ok(Json(request))
}

/// POST /leave-requests/{request_id}/transition
async fn transition_request(
    State(state): State<AppState>,
    Path(request_id): Path<LeaveRequestId>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<CommittedLeaveTransition>, ApiError> {
    let committed = blocking(&state, move |service| {
        service.transition_leave_request(
            request_id,
            request.action,
            request.actor_id,
            request.comment,
        )
    })
    .await?;
    Ok(Json(committed))
}

/// GET /leave-requests/{request_id}/timeline
async fn get_timeline(
    State(state): State<AppState>,
    Path(request_id): Path<LeaveRequestId>,
) -> Result<Json<Vec<LeaveEvent>>, ApiError> {
    let events = blocking(&state, move |service| service.leave_timeline(request_id)).await?;
    Ok(Json(events))
}
