//! Liveness of the service and its store.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tracing::error;

use crate::AppState;

/// Health payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `healthy` or `unavailable`.
    pub status: &'static str,
    /// `ok` while the store serves reads.
    pub store: &'static str,
    /// Crate version.
    pub version: &'static str,
}

/// GET `/health` - 200 while the store answers, 503 once it is poisoned.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let version = env!("CARGO_PKG_VERSION");
    match state.stock.ping() {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                store: "ok",
                version,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Store failed health check");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable",
                    store: "poisoned",
                    version,
                }),
            )
        }
    }
}

/// Creates the health routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
