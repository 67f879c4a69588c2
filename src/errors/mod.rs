//! Unified error handling with consistent API response envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: &str) -> Json<Self> {
        Json(Self {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        })
    }
}

/// Application error type mapping to HTTP status codes.
///
/// Listing validation failures each get their own variant so the caller can
/// tell exactly which input was rejected; best-effort side effects (leads,
/// notifications) never surface here.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid category '{0}'")]
    InvalidCategory(String),

    #[error("Registration number is required")]
    MissingRegistrationNumber,

    #[error("Duplicate registration number '{0}'")]
    DuplicateRegistration(String),

    #[error("Invalid referral code")]
    InvalidReferralCode,

    #[error("Invalid plan ID format: '{0}'")]
    InvalidPlanId(String),

    #[error("Plan not found")]
    PlanNotFound,

    #[error("Invalid JSON in {0}")]
    MalformedInput(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Check if this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::InvalidCategory(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_CATEGORY", self.to_string())
            }
            AppError::MissingRegistrationNumber => (
                StatusCode::BAD_REQUEST,
                "MISSING_REGISTER_NUMBER",
                self.to_string(),
            ),
            AppError::DuplicateRegistration(_) => (
                StatusCode::CONFLICT,
                "DUPLICATE_REGISTRATION",
                self.to_string(),
            ),
            AppError::InvalidReferralCode => (
                StatusCode::BAD_REQUEST,
                "INVALID_REFERRAL_CODE",
                self.to_string(),
            ),
            AppError::InvalidPlanId(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_PLAN_ID", self.to_string())
            }
            AppError::PlanNotFound => {
                (StatusCode::BAD_REQUEST, "PLAN_NOT_FOUND", self.to_string())
            }
            AppError::MalformedInput(_) => {
                (StatusCode::BAD_REQUEST, "MALFORMED_INPUT", self.to_string())
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()> {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message,
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success() {
        let response = ApiResponse::success("hello");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["data"], "hello");
        assert!(json["error"].is_null());
    }

    #[test]
    fn api_response_error() {
        let response = ApiResponse::<()>::error("NOT_FOUND", "Business not found");
        let json = serde_json::to_value(&response.0).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Business not found");
    }

    #[test]
    fn app_error_is_not_found() {
        let err = AppError::NotFound("business".to_string());
        assert!(err.is_not_found());
        assert!(!AppError::InvalidReferralCode.is_not_found());
    }

    #[test]
    fn validation_failures_name_the_offender() {
        let err = AppError::MalformedInput("location".to_string());
        assert_eq!(err.to_string(), "Invalid JSON in location");

        let err = AppError::DuplicateRegistration("H-100".to_string());
        assert!(err.to_string().contains("H-100"));

        let err = AppError::InvalidCategory("Garage".to_string());
        assert!(err.to_string().contains("Garage"));
    }

    #[test]
    fn app_error_from_sqlx() {
        let sqlx_err = sqlx::Error::RowNotFound;
        let err: AppError = sqlx_err.into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
