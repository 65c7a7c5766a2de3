//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes for the shift lifecycle and the fuel stock ledger
//! - Request bodies that resolve vendor fuel names through the catalog
//! - The JSON error envelope

pub mod dto;
pub mod error;
pub mod routes;

use axum::Router;
use fuelbook_shared::AppConfig;
use fuelbook_store::{ShiftRepository, StockRepository, Store};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shift lifecycle repository.
    pub shifts: ShiftRepository,
    /// Fuel stock ledger repository.
    pub stock: StockRepository,
}

impl AppState {
    /// Builds repositories over a fresh store.
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        let store = Arc::new(Store::new());
        Self {
            shifts: ShiftRepository::new(Arc::clone(&store), config.reconciliation.clone()),
            stock: StockRepository::new(store),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
