//! Arena tables.

use fuelbook_core::archive::SealedArchive;
use fuelbook_core::catalog::FuelType;
use fuelbook_core::shift::{Shift, ShiftAuditEvent};
use fuelbook_core::stock::{FuelInvoiceBatch, MonthlyStockSummary, StockDepletion, YearMonth};
use fuelbook_shared::types::{InvoiceBatchId, ShiftId};
use std::collections::{BTreeMap, HashMap};

#[derive(Default)]
pub(crate) struct Tables {
    pub(crate) shifts: HashMap<ShiftId, Shift>,
    /// Append-only, in insertion order.
    pub(crate) audit: HashMap<ShiftId, Vec<ShiftAuditEvent>>,
    pub(crate) archives: HashMap<ShiftId, SealedArchive>,
    pub(crate) batches: BTreeMap<InvoiceBatchId, FuelInvoiceBatch>,
    pub(crate) depletions: Vec<StockDepletion>,
    pub(crate) summaries: BTreeMap<(FuelType, YearMonth), MonthlyStockSummary>,
    pub(crate) next_sequence: u64,
}

impl Tables {
    pub(crate) fn shift(&self, id: ShiftId) -> Option<&Shift> {
        self.shifts.get(&id)
    }

    pub(crate) fn fuel_batches(&self, fuel: FuelType) -> impl Iterator<Item = &FuelInvoiceBatch> {
        self.batches.values().filter(move |b| b.fuel == fuel)
    }

    pub(crate) fn is_month_locked(&self, fuel: FuelType, period: YearMonth) -> bool {
        self.summaries
            .get(&(fuel, period))
            .is_some_and(|summary| summary.locked)
    }

    pub(crate) fn append_audit(&mut self, event: ShiftAuditEvent) {
        self.audit.entry(event.shift_id).or_default().push(event);
    }
}
