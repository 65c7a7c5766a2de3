//! Fuel stock ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use fuelbook_core::catalog::{FuelCatalog, FuelType};
use fuelbook_core::stock::{FuelInvoiceBatch, LedgerPosition, MonthlyStockSummary, StockDepletion};
use fuelbook_shared::types::{PageRequest, PageResponse};
use serde::Serialize;

use crate::dto::{ActorRequest, RecordInvoiceRequest, fuel_param};
use crate::{ApiError, AppState};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Creates the stock routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fuels", get(list_fuels))
        .route("/stock/{fuel}/invoices", post(record_invoice))
        .route("/stock/{fuel}/ledger", get(ledger_position))
        .route("/stock/{fuel}/depletions", get(list_depletions))
        .route("/stock/{fuel}/summaries", get(list_summaries))
        .route("/stock/{fuel}/summaries/{year}/{month}", get(get_summary))
        .route("/stock/{fuel}/summaries/{year}/{month}/rollup", post(rollup_month))
        .route("/stock/{fuel}/summaries/{year}/{month}/lock", post(lock_month))
}

/// A catalog fuel and the vendor names that resolve to it.
#[derive(Debug, Serialize)]
pub struct FuelResponse {
    /// Canonical code.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Known vendor aliases.
    pub aliases: Vec<&'static str>,
}

/// GET `/fuels` - The fuel catalog.
async fn list_fuels() -> Json<Vec<FuelResponse>> {
    Json(
        FuelType::ALL
            .iter()
            .map(|fuel| FuelResponse {
                code: fuel.as_str(),
                name: fuel.display_name(),
                aliases: FuelCatalog::aliases(*fuel),
            })
            .collect(),
    )
}

/// POST `/stock/{fuel}/invoices` - Record a supplier invoice as a FIFO batch.
async fn record_invoice(
    State(state): State<AppState>,
    Path(fuel): Path<String>,
    Json(payload): Json<RecordInvoiceRequest>,
) -> Result<(StatusCode, Json<FuelInvoiceBatch>), ApiError> {
    let fuel = fuel_param(&fuel)?;
    let batch = state.stock.record_invoice(
        fuel,
        &payload.invoice_number,
        payload.invoice_date,
        payload.quantity,
    )?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// GET `/stock/{fuel}/ledger` - Batches in FIFO order with totals.
async fn ledger_position(
    State(state): State<AppState>,
    Path(fuel): Path<String>,
) -> ApiResult<LedgerPosition> {
    Ok(Json(state.stock.position(fuel_param(&fuel)?)?))
}

/// GET `/stock/{fuel}/depletions` - Paginated depletion history.
async fn list_depletions(
    State(state): State<AppState>,
    Path(fuel): Path<String>,
    Query(page): Query<PageRequest>,
) -> ApiResult<PageResponse<StockDepletion>> {
    let depletions = state.stock.depletions(fuel_param(&fuel)?)?;
    Ok(Json(page.paginate(depletions)))
}

/// GET `/stock/{fuel}/summaries` - Stored monthly summaries.
async fn list_summaries(
    State(state): State<AppState>,
    Path(fuel): Path<String>,
) -> ApiResult<Vec<MonthlyStockSummary>> {
    Ok(Json(state.stock.summaries(fuel_param(&fuel)?)?))
}

/// GET `/stock/{fuel}/summaries/{year}/{month}` - One stored summary.
async fn get_summary(
    State(state): State<AppState>,
    Path((fuel, year, month)): Path<(String, i32, u32)>,
) -> ApiResult<MonthlyStockSummary> {
    let fuel = fuel_param(&fuel)?;
    state
        .stock
        .summary(fuel, year, month)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No summary for {fuel} {year}-{month:02}")))
}

/// POST `/stock/{fuel}/summaries/{year}/{month}/rollup` - Recompute a month.
async fn rollup_month(
    State(state): State<AppState>,
    Path((fuel, year, month)): Path<(String, i32, u32)>,
) -> ApiResult<MonthlyStockSummary> {
    Ok(Json(state.stock.rollup_month(fuel_param(&fuel)?, year, month)?))
}

/// POST `/stock/{fuel}/summaries/{year}/{month}/lock` - Roll up and lock a month.
async fn lock_month(
    State(state): State<AppState>,
    Path((fuel, year, month)): Path<(String, i32, u32)>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<MonthlyStockSummary> {
    Ok(Json(state.stock.lock_month(
        fuel_param(&fuel)?,
        year,
        month,
        payload.actor.id,
    )?))
}
