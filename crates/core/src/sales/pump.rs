//! Pump meter reconciliation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregator::SalesSummary;
use super::types::{NozzleRef, PumpIndexReading};
use crate::catalog::FuelType;

/// Meter delta against summed sales for one nozzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpIndexVariance {
    /// Pump and nozzle.
    pub nozzle: NozzleRef,
    /// Fuel on the nozzle.
    pub fuel: FuelType,
    /// `end_index - start_index`.
    pub meter_delta: Decimal,
    /// Litres reported by automation and fleet sales on the nozzle.
    pub sold_quantity: Decimal,
    /// `meter_delta - sold_quantity`.
    pub variance: Decimal,
    /// Whether `|variance|` is within the configured tolerance.
    pub within_tolerance: bool,
}

/// Compares pump meter readings against the sales summary.
pub struct PumpReconciler;

impl PumpReconciler {
    /// Produces one variance row per reading, in nozzle order.
    ///
    /// Readings whose meter went backwards are skipped; they are rejected
    /// when the readings are recorded.
    #[must_use]
    pub fn reconcile(
        readings: &[PumpIndexReading],
        summary: &SalesSummary,
        tolerance: Decimal,
    ) -> Vec<PumpIndexVariance> {
        let mut rows: Vec<PumpIndexVariance> = readings
            .iter()
            .filter_map(|reading| {
                let meter_delta = reading.meter_delta()?;
                let sold_quantity = summary.nozzle_quantity(reading.nozzle);
                let variance = meter_delta - sold_quantity;
                Some(PumpIndexVariance {
                    nozzle: reading.nozzle,
                    fuel: reading.fuel,
                    meter_delta,
                    sold_quantity,
                    variance,
                    within_tolerance: variance.abs() <= tolerance,
                })
            })
            .collect();
        rows.sort_by_key(|row| row.nozzle);
        rows
    }
}
