//! JSON error envelope.
//!
//! Every failure renders as `{"error": CODE, "message": TEXT}` with the
//! status of the underlying error. Validation failures add `"details"`.

use accrual_core::leave::LeaveError;
use accrual_core::overtime::OvertimeError;
use accrual_shared::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::{error, warn};

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<Value>,
}

impl ApiError {
    fn new(status: u16, code: &'static str, message: String) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code,
            message,
            details: None,
        }
    }

    #[must_use]
    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<OvertimeError> for ApiError {
    fn from(err: OvertimeError) -> Self {
        let api = Self::new(err.status_code(), err.error_code(), err.to_string());
        match &err {
            OvertimeError::Validation(errors) => api.with_details(json!(errors)),
            OvertimeError::WeekdayConfirmationRequired { dates } => {
                api.with_details(json!({ "dates": dates }))
            }
            _ => api,
        }
    }
}

impl From<LeaveError> for ApiError {
    fn from(err: LeaveError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(err.status_code(), err.error_code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, message = %self.message, "Request failed");
        } else {
            warn!(code = self.code, message = %self.message, "Request rejected");
        }

        let mut body = json!({
            "error": self.code,
            "message": self.message,
        });
        if let (Some(details), Some(obj)) = (self.details, body.as_object_mut()) {
            obj.insert("details".to_string(), details);
        }
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accrual_core::overtime::{EntryField, FieldError, ValidationIssue};

    #[test]
    fn test_validation_error_carries_details() {
        let err = ApiError::from(OvertimeError::Validation(vec![FieldError {
            entry_index: Some(0),
            field: EntryField::Hours,
            issue: ValidationIssue::HoursNotHalfHour,
        }]));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        let details = err.details.unwrap();
        assert_eq!(details[0]["field"], "hours");
        assert_eq!(details[0]["issue"]["code"], "hours_not_half_hour");
    }

    #[test]
    fn test_owner_error_is_forbidden() {
        let err = ApiError::from(LeaveError::NotRequestOwner);
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_passthrough() {
        let err = ApiError::from(AppError::PolicyUnavailable("down".into()));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.code(), "POLICY_UNAVAILABLE");
    }
}
