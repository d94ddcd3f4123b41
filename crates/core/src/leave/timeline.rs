//! Lifecycle timeline derived from a leave request's timestamps.

use accrual_shared::types::EmployeeId;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::LeaveRequest;

/// Kind of lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveEventKind {
    /// Request created.
    Submitted,
    /// Request approved.
    Approved,
    /// Request rejected.
    Rejected,
    /// Request cancelled.
    Cancelled,
}

/// One entry of a request's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaveEvent {
    /// What happened.
    pub kind: LeaveEventKind,
    /// When it happened.
    pub at: DateTime<Utc>,
    /// Who did it, when recorded.
    pub actor: Option<EmployeeId>,
    /// Reason attached to the event.
    pub note: Option<String>,
}

/// Builds the ordered event list for `request`.
///
/// Submission always comes first; the remaining events follow in timestamp
/// order, ties keeping the approved, rejected, cancelled order.
#[must_use]
pub fn leave_timeline(request: &LeaveRequest) -> Vec<LeaveEvent> {
    let submitted = LeaveEvent {
        kind: LeaveEventKind::Submitted,
        at: request.created_at,
        actor: Some(request.employee_id),
        note: request.reason.clone(),
    };

    let mut later: Vec<LeaveEvent> = [
        request.approved_at.map(|at| LeaveEvent {
            kind: LeaveEventKind::Approved,
            at,
            actor: request.approved_by,
            note: None,
        }),
        request.rejected_at.map(|at| LeaveEvent {
            kind: LeaveEventKind::Rejected,
            at,
            actor: request.rejected_by,
            note: request.rejection_reason.clone(),
        }),
        request.cancelled_at.map(|at| LeaveEvent {
            kind: LeaveEventKind::Cancelled,
            at,
            actor: Some(request.employee_id),
            note: request.cancellation_reason.clone(),
        }),
    ]
    .into_iter()
    .flatten()
    .collect();
    later.sort_by_key(|event| event.at);

    std::iter::once(submitted).chain(later).collect()
}
