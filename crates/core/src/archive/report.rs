//! Archived shift report.

use chrono::{DateTime, NaiveDate, Utc};
use fuelbook_shared::types::{ArchiveId, InvoiceBatchId, ShiftId, StationId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::FuelType;
use crate::reconciliation::{CashSlip, ReconciliationResult};
use crate::sales::{PumpIndexVariance, SalesBreakdown};
use crate::shift::{Actor, ReconciliationSnapshot, Shift, ShiftTotals};
use crate::stock::DepletionPlan;
use crate::tank::TankInventorySnapshot;

/// Litres taken from one invoice batch by the approved shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedDepletion {
    /// Fuel.
    pub fuel: FuelType,
    /// Batch.
    pub batch_id: InvoiceBatchId,
    /// Invoice number.
    pub invoice_number: String,
    /// Invoice date.
    pub invoice_date: NaiveDate,
    /// Litres taken.
    pub quantity: Decimal,
    /// Litres left in the batch afterwards.
    pub remaining_after: Decimal,
}

/// Self-contained record of an approved shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedShiftReport {
    /// Archive id.
    pub id: ArchiveId,
    /// Shift.
    pub shift_id: ShiftId,
    /// Station.
    pub station_id: StationId,
    /// Shift open time.
    pub opened_at: DateTime<Utc>,
    /// Shift close time.
    pub closed_at: DateTime<Utc>,
    /// Business date used for stock attribution.
    pub business_date: NaiveDate,
    /// Totals.
    pub totals: ShiftTotals,
    /// Collection reconciliation.
    pub reconciliation: ReconciliationResult,
    /// Sales rows.
    pub sales: SalesBreakdown,
    /// Tank variances.
    pub tanks: Vec<TankInventorySnapshot>,
    /// Pump meter variances.
    pub pumps: Vec<PumpIndexVariance>,
    /// Cash slips as approved.
    pub cash_slips: Vec<CashSlip>,
    /// FIFO depletions caused by the approval.
    pub depletions: Vec<ArchivedDepletion>,
    /// Approver.
    pub approved_by: UserId,
    /// Approver display name.
    pub approver_name: Option<String>,
    /// Approval time.
    pub approved_at: DateTime<Utc>,
}

/// Assembles archived reports.
pub struct ArchiveBuilder;

impl ArchiveBuilder {
    /// Builds the report for a shift being approved.
    #[must_use]
    pub fn build(
        shift: &Shift,
        snapshot: &ReconciliationSnapshot,
        plans: &[DepletionPlan],
        approver: &Actor,
        at: DateTime<Utc>,
    ) -> ArchivedShiftReport {
        let depletions = plans
            .iter()
            .flat_map(|plan| {
                plan.slices.iter().map(|slice| ArchivedDepletion {
                    fuel: plan.fuel,
                    batch_id: slice.batch_id,
                    invoice_number: slice.invoice_number.clone(),
                    invoice_date: slice.invoice_date,
                    quantity: slice.quantity,
                    remaining_after: slice.remaining_after,
                })
            })
            .collect();

        ArchivedShiftReport {
            id: ArchiveId::new(),
            shift_id: shift.id,
            station_id: shift.station_id,
            opened_at: shift.opened_at,
            closed_at: shift.closed_at,
            business_date: shift.business_date(),
            totals: snapshot.totals,
            reconciliation: snapshot.reconciliation.clone(),
            sales: snapshot.sales.clone(),
            tanks: snapshot.tanks.clone(),
            pumps: snapshot.pumps.clone(),
            cash_slips: shift.cash_slips.values().cloned().collect(),
            depletions,
            approved_by: approver.id,
            approver_name: approver.name.clone(),
            approved_at: at,
        }
    }

    /// Litres depleted per fuel in the report.
    #[must_use]
    pub fn depleted(report: &ArchivedShiftReport, fuel: FuelType) -> Decimal {
        report
            .depletions
            .iter()
            .filter(|d| d.fuel == fuel)
            .map(|d| d.quantity)
            .sum()
    }
}
