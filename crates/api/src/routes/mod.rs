//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod shifts;
pub mod stock;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(shifts::routes())
        .merge(stock::routes())
}
