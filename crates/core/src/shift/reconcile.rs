//! Shift-level reconciliation: aggregates sales and runs every reconciler
//! against the shift's child records.

use chrono::{DateTime, Utc};
use fuelbook_shared::ReconciliationConfig;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::error::ShiftError;
use super::types::{ReconciliationSnapshot, Shift, ShiftTotals};
use crate::catalog::FuelType;
use crate::reconciliation::{ReconciliationEngine, ReconciliationThresholds};
use crate::sales::PumpReconciler;
use crate::tank::TankReconciler;

/// Builds reconciliation snapshots for shifts.
pub struct ShiftReconciler;

impl ShiftReconciler {
    /// Reconciles a shift.
    ///
    /// Fails with `IncompleteReconciliation` when slips are required and an
    /// attendant with automation sales has none.
    pub fn reconcile(
        shift: &Shift,
        config: &ReconciliationConfig,
        at: DateTime<Utc>,
    ) -> Result<ReconciliationSnapshot, ShiftError> {
        if config.require_slip_per_attendant {
            let missing = ReconciliationEngine::missing_slips(
                shift.automation_attendants(),
                shift.cash_slips.values(),
            );
            if !missing.is_empty() {
                return Err(ShiftError::IncompleteReconciliation {
                    missing_attendants: missing,
                });
            }
        }

        let summary = shift.sales_summary();
        let reconciliation = ReconciliationEngine::reconcile(
            &summary,
            shift.cash_slips.values(),
            &ReconciliationThresholds::from(config),
        );
        let totals = ShiftTotals {
            pump_total: summary.pump_total(),
            market_total: summary.market_total,
            grand_total: summary.grand_total(),
            collections_total: reconciliation.collections_total,
            difference: reconciliation.difference,
        };

        Ok(ReconciliationSnapshot {
            totals,
            sales: summary.breakdown(),
            tanks: TankReconciler::reconcile(&shift.tank_readings, &summary),
            pumps: PumpReconciler::reconcile(
                &shift.pump_readings,
                &summary,
                config.pump_index_tolerance,
            ),
            reconciliation,
            computed_at: at,
        })
    }

    /// Litres to deplete per fuel on approval. Fuels with no sales are omitted.
    #[must_use]
    pub fn depletion_requests(shift: &Shift) -> BTreeMap<FuelType, Decimal> {
        shift
            .sales_summary()
            .by_fuel
            .into_iter()
            .filter(|(_, line)| line.quantity > Decimal::ZERO)
            .map(|(fuel, line)| (fuel, line.quantity))
            .collect()
    }
}
