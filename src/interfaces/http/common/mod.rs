//! Shared pieces of the JSON API: the response envelope, error mapping
//! and the validating extractor.

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::shared::FieldErrors;

pub use validated_json::ValidatedJson;

/// Standard API response envelope
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "error": "...", "errors": {"field": ["..."]}}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field-level messages for 422 responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: None,
        }
    }

    pub fn invalid(errors: FieldErrors) -> Self {
        Self {
            success: false,
            data: None,
            error: Some("Validation failed".to_string()),
            errors: Some(errors),
        }
    }
}

/// Empty payload for operations without return data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

/// Map a domain failure to its HTTP status and envelope.
pub fn domain_error(e: DomainError) -> ApiError {
    match e {
        DomainError::NotFound { .. } => api_error(StatusCode::NOT_FOUND, e.to_string()),
        DomainError::Invalid(errors) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::invalid(errors)))
        }
        DomainError::Validation(msg) => api_error(StatusCode::UNPROCESSABLE_ENTITY, msg),
        DomainError::Conflict(_) | DomainError::Protected { .. } => {
            api_error(StatusCode::CONFLICT, e.to_string())
        }
        DomainError::Unauthorized(msg) => api_error(StatusCode::UNAUTHORIZED, msg),
        DomainError::Forbidden(msg) => api_error(StatusCode::FORBIDDEN, msg),
        DomainError::Storage(msg) => {
            error!("Storage failure: {}", msg);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
