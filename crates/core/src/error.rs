//! Error taxonomy shared by the engine's module errors.

use accrual_shared::AppError;
use serde::Serialize;

/// Coarse class of an engine error, used for retry decisions and HTTP mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// User-correctable input.
    Validation,
    /// Duplicate recap, claimed date, stale write.
    Conflict,
    /// Illegal lifecycle transition.
    State,
    /// Upstream collaborator failure; retry with backoff.
    PolicyUnavailable,
    /// Unknown employee or request.
    NotFound,
    /// Actor may not perform the action.
    Forbidden,
    /// Well-formed input that a business rule refuses.
    BusinessRule,
    /// Misconfiguration.
    Internal,
}

impl ErrorCategory {
    /// Wraps `message` in the matching [`AppError`] variant.
    #[must_use]
    pub fn into_app_error(self, message: String) -> AppError {
        match self {
            Self::Validation => AppError::Validation(message),
            Self::Conflict => AppError::Conflict(message),
            Self::State => AppError::InvalidState(message),
            Self::PolicyUnavailable => AppError::PolicyUnavailable(message),
            Self::NotFound => AppError::NotFound(message),
            Self::Forbidden => AppError::Forbidden(message),
            Self::BusinessRule => AppError::BusinessRule(message),
            Self::Internal => AppError::Internal(message),
        }
    }
}
