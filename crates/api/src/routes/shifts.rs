//! Shift import, editing and lifecycle routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use fuelbook_core::archive::ArchivedShiftReport;
use fuelbook_core::sales::AttendantId;
use fuelbook_core::shift::{ReconciliationSnapshot, Shift, ShiftAuditEvent, ShiftStatus};
use fuelbook_core::stock::StockDepletion;
use fuelbook_core::tank::TankInventorySnapshot;
use fuelbook_shared::types::{PageRequest, PageResponse, ShiftId, StationId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dto::{
    ActorRequest, CashSlipRequest, ImportShiftRequest, PumpReadingsRequest, ReasonRequest,
    TankReadingsRequest, VersionQuery,
};
use crate::{ApiError, AppState};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Creates the shift routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shifts", get(list_shifts).post(import_shift))
        .route("/shifts/{id}", get(get_shift))
        .route(
            "/shifts/{id}/cash-slips/{attendant}",
            put(upsert_cash_slip).delete(remove_cash_slip),
        )
        .route("/shifts/{id}/pump-readings", put(set_pump_readings))
        .route("/shifts/{id}/tank-readings", put(set_tank_readings))
        .route("/shifts/{id}/submit", post(submit_shift))
        .route("/shifts/{id}/approve", post(approve_shift))
        .route("/shifts/{id}/reject", post(reject_shift))
        .route("/shifts/{id}/reopen", post(reopen_shift))
        .route("/shifts/{id}/deletion-request", post(request_deletion))
        .route("/shifts/{id}/deletion-confirm", post(confirm_deletion))
        .route("/shifts/{id}/deletion-decline", post(decline_deletion))
        .route("/shifts/{id}/audit", get(audit_trail))
        .route("/shifts/{id}/archive", get(get_archive))
        .route("/shifts/{id}/tank-variance", get(tank_variance))
        .route("/shifts/{id}/depletions", get(shift_depletions))
}

/// Query parameters for listing shifts.
#[derive(Debug, Deserialize)]
pub struct ListShiftsQuery {
    /// Filter by station.
    pub station_id: Option<StationId>,
    /// Filter by status (e.g. `pending_approval`).
    pub status: Option<String>,
}

/// Archived report with its integrity digest.
#[derive(Debug, Serialize)]
pub struct ArchiveResponse {
    /// The frozen report.
    pub report: ArchivedShiftReport,
    /// SHA-256 of the canonical JSON.
    pub digest: String,
    /// Whether the stored JSON still matches the digest.
    pub verified: bool,
}

/// GET `/shifts` - List shifts, most recently closed first.
async fn list_shifts(
    State(state): State<AppState>,
    Query(query): Query<ListShiftsQuery>,
) -> ApiResult<Vec<Shift>> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            ShiftStatus::parse(s)
                .ok_or_else(|| ApiError::validation(format!("Unknown status: {s}")))
        })
        .transpose()?;
    Ok(Json(state.shifts.list(query.station_id, status)?))
}

/// POST `/shifts` - Import a shift from normalized sales.
async fn import_shift(
    State(state): State<AppState>,
    Json(payload): Json<ImportShiftRequest>,
) -> Result<(StatusCode, Json<Shift>), ApiError> {
    let (import, actor) = payload.into_import()?;
    let shift = state.shifts.import_shift(import, &actor)?;
    Ok((StatusCode::CREATED, Json(shift)))
}

/// GET `/shifts/{id}` - Shift with its child records.
async fn get_shift(State(state): State<AppState>, Path(id): Path<ShiftId>) -> ApiResult<Shift> {
    Ok(Json(state.shifts.get(id)?))
}

/// PUT `/shifts/{id}/cash-slips/{attendant}` - Create or replace a cash slip.
async fn upsert_cash_slip(
    State(state): State<AppState>,
    Path((id, attendant)): Path<(ShiftId, String)>,
    Json(payload): Json<CashSlipRequest>,
) -> ApiResult<Shift> {
    let expected_version = payload.expected_version;
    let slip = payload.into_slip(AttendantId::new(attendant));
    Ok(Json(state.shifts.upsert_cash_slip(id, slip, expected_version)?))
}

/// DELETE `/shifts/{id}/cash-slips/{attendant}` - Remove a cash slip.
async fn remove_cash_slip(
    State(state): State<AppState>,
    Path((id, attendant)): Path<(ShiftId, String)>,
    Query(query): Query<VersionQuery>,
) -> ApiResult<Shift> {
    let attendant = AttendantId::new(attendant);
    Ok(Json(state.shifts.remove_cash_slip(
        id,
        &attendant,
        query.expected_version,
    )?))
}

/// PUT `/shifts/{id}/pump-readings` - Replace pump meter readings.
async fn set_pump_readings(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Json(payload): Json<PumpReadingsRequest>,
) -> ApiResult<Shift> {
    let (readings, expected_version) = payload.into_readings()?;
    Ok(Json(state.shifts.set_pump_readings(id, readings, expected_version)?))
}

/// PUT `/shifts/{id}/tank-readings` - Replace tank readings.
async fn set_tank_readings(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Json(payload): Json<TankReadingsRequest>,
) -> ApiResult<Shift> {
    let (readings, expected_version) = payload.into_readings()?;
    Ok(Json(state.shifts.set_tank_readings(id, readings, expected_version)?))
}

/// POST `/shifts/{id}/submit` - Reconcile and submit for approval.
async fn submit_shift(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<ReconciliationSnapshot> {
    Ok(Json(state.shifts.submit(id, payload.actor)?))
}

/// POST `/shifts/{id}/approve` - Approve, archive and deplete stock.
async fn approve_shift(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<ArchiveResponse> {
    let sealed = state.shifts.approve(id, payload.actor)?;
    info!(shift_id = %id, digest = %sealed.digest, "Archive issued");
    Ok(Json(ArchiveResponse {
        verified: sealed.verify(),
        report: sealed.report,
        digest: sealed.digest,
    }))
}

/// POST `/shifts/{id}/reject` - Send back for corrections.
async fn reject_shift(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Json(payload): Json<ReasonRequest>,
) -> ApiResult<Shift> {
    Ok(Json(state.shifts.reject(id, payload.actor, &payload.reason)?))
}

/// POST `/shifts/{id}/reopen` - Reopen a rejected shift.
async fn reopen_shift(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<Shift> {
    Ok(Json(state.shifts.reopen(id, payload.actor)?))
}

/// POST `/shifts/{id}/deletion-request` - Ask for deletion.
async fn request_deletion(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Json(payload): Json<ReasonRequest>,
) -> ApiResult<Shift> {
    Ok(Json(state.shifts.request_deletion(
        id,
        payload.actor,
        &payload.reason,
    )?))
}

/// POST `/shifts/{id}/deletion-confirm` - Confirm a deletion request.
async fn confirm_deletion(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Json(payload): Json<ActorRequest>,
) -> ApiResult<Shift> {
    Ok(Json(state.shifts.confirm_deletion(id, payload.actor)?))
}

/// POST `/shifts/{id}/deletion-decline` - Decline a deletion request.
async fn decline_deletion(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Json(payload): Json<ReasonRequest>,
) -> ApiResult<Shift> {
    Ok(Json(state.shifts.decline_deletion(
        id,
        payload.actor,
        &payload.reason,
    )?))
}

/// GET `/shifts/{id}/audit` - Paginated audit trail, oldest first.
async fn audit_trail(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
    Query(page): Query<PageRequest>,
) -> ApiResult<PageResponse<ShiftAuditEvent>> {
    Ok(Json(page.paginate(state.shifts.audit_trail(id)?)))
}

/// GET `/shifts/{id}/archive` - Archived report of an approved shift.
async fn get_archive(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
) -> ApiResult<ArchiveResponse> {
    let sealed = state.shifts.archive(id)?;
    Ok(Json(ArchiveResponse {
        verified: sealed.verify(),
        report: sealed.report,
        digest: sealed.digest,
    }))
}

/// GET `/shifts/{id}/tank-variance` - Per-tank expected consumption vs sales.
async fn tank_variance(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
) -> ApiResult<Vec<TankInventorySnapshot>> {
    Ok(Json(state.shifts.tank_variance(id)?))
}

/// GET `/shifts/{id}/depletions` - FIFO slices taken by the shift's approval.
async fn shift_depletions(
    State(state): State<AppState>,
    Path(id): Path<ShiftId>,
) -> ApiResult<Vec<StockDepletion>> {
    state.shifts.get(id)?;
    Ok(Json(state.stock.depletions_for_shift(id)?))
}
