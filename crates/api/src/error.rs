//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fuelbook_core::catalog::UnknownFuel;
use fuelbook_core::shift::ShiftError;
use fuelbook_core::stock::StockError;
use fuelbook_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// Handler error rendered as `{"error": {"code", "message"}}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Malformed request input.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Missing resource.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }
}

impl From<ShiftError> for ApiError {
    fn from(err: ShiftError) -> Self {
        Self(AppError::from_domain(
            err.status_code(),
            err.error_code(),
            err.to_string(),
        ))
    }
}

impl From<StockError> for ApiError {
    fn from(err: StockError) -> Self {
        Self(AppError::from_domain(
            err.status_code(),
            err.error_code(),
            err.to_string(),
        ))
    }
}

impl From<UnknownFuel> for ApiError {
    fn from(err: UnknownFuel) -> Self {
        ShiftError::from(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = self.0.error_code();

        if status.is_server_error() {
            error!(code, error = %self.0, "Request failed");
        } else {
            warn!(code, error = %self.0, "Request refused");
        }

        (
            status,
            Json(json!({
                "error": {
                    "code": code,
                    "message": self.0.to_string(),
                }
            })),
        )
            .into_response()
    }
}
