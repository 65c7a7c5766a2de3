//! Fuel stock ledger repository.

use chrono::{NaiveDate, Utc};
use fuelbook_core::catalog::FuelType;
use fuelbook_core::stock::{
    FuelInvoiceBatch, LedgerPosition, MonthlyRollup, MonthlyStockSummary, StockDepletion,
    StockError, YearMonth,
};
use fuelbook_shared::types::{ShiftId, UserId};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};

use crate::locks::acquire;
use crate::tables::Tables;
use crate::Store;

/// Invoice intake, monthly rollups and ledger queries.
///
/// Every mutation holds the fuel's lock, so FIFO state for one fuel never
/// interleaves while different fuels proceed in parallel.
#[derive(Clone)]
pub struct StockRepository {
    store: Arc<Store>,
}

impl StockRepository {
    /// Creates a repository over a store.
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Records a supplier invoice as a new FIFO batch.
    pub fn record_invoice(
        &self,
        fuel: FuelType,
        invoice_number: &str,
        invoice_date: NaiveDate,
        quantity: Decimal,
    ) -> Result<FuelInvoiceBatch, StockError> {
        if quantity <= Decimal::ZERO {
            return Err(StockError::InvalidQuantity(quantity));
        }
        let invoice_number = invoice_number.trim();

        let handle = self.store.fuel_locks.handle(fuel);
        let _guard = acquire(&handle, "fuel", &fuel)?;

        let batch = self.store.write(|t: &mut Tables| {
            if t
                .fuel_batches(fuel)
                .any(|b| b.invoice_number == invoice_number)
            {
                return Err(StockError::DuplicateInvoice {
                    fuel,
                    invoice_number: invoice_number.to_string(),
                });
            }
            let period = YearMonth::of(invoice_date);
            if t.is_month_locked(fuel, period) {
                return Err(StockError::MonthLocked {
                    fuel,
                    year: period.year,
                    month: period.month,
                });
            }

            let batch = FuelInvoiceBatch::new(
                fuel,
                invoice_number,
                invoice_date,
                quantity,
                t.next_sequence,
            );
            t.next_sequence += 1;
            t.batches.insert(batch.id, batch.clone());
            Ok(batch)
        });

        match &batch {
            Ok(batch) => info!(
                fuel = %fuel,
                invoice = %batch.invoice_number,
                quantity = %batch.quantity,
                "Invoice recorded"
            ),
            Err(e) => warn!(fuel = %fuel, error = %e, "Invoice rejected"),
        }
        batch
    }

    /// Computes and stores the monthly summary of a fuel.
    pub fn rollup_month(
        &self,
        fuel: FuelType,
        year: i32,
        month: u32,
    ) -> Result<MonthlyStockSummary, StockError> {
        let period = YearMonth::new(year, month)?;
        let handle = self.store.fuel_locks.handle(fuel);
        let _guard = acquire(&handle, "fuel", &fuel)?;

        let summary = self.store.write(|t: &mut Tables| {
            let summary = Self::compute(t, fuel, period)?;
            t.summaries.insert((fuel, period), summary.clone());
            Ok(summary)
        });

        match &summary {
            Ok(s) => info!(
                fuel = %fuel,
                period = %period,
                remaining = %s.remaining_stock,
                "Stock month rolled up"
            ),
            Err(e) => warn!(fuel = %fuel, period = %period, error = %e, "Rollup refused"),
        }
        summary
    }

    /// Rolls the month up and locks it. Locked months cannot be relocked.
    ///
    /// Refuses while earlier stock movement exists but the previous month
    /// was never rolled up, since its carry-in would read as zero.
    pub fn lock_month(
        &self,
        fuel: FuelType,
        year: i32,
        month: u32,
        actor: UserId,
    ) -> Result<MonthlyStockSummary, StockError> {
        let period = YearMonth::new(year, month)?;
        let handle = self.store.fuel_locks.handle(fuel);
        let _guard = acquire(&handle, "fuel", &fuel)?;

        let locked = self.store.write(|t: &mut Tables| {
            MonthlyRollup::ensure_carry_in_known(
                fuel,
                period,
                Self::previous_summary(t, fuel, period),
                t.fuel_batches(fuel),
                t.depletions.iter().filter(|d| d.fuel == fuel),
            )?;
            let summary = Self::compute(t, fuel, period)?;
            let locked = MonthlyRollup::lock(&summary, actor, Utc::now())?;
            t.summaries.insert((fuel, period), locked.clone());
            Ok::<_, StockError>(locked)
        })?;

        info!(fuel = %fuel, period = %period, actor = %actor, "Stock month locked");
        Ok(locked)
    }

    /// The carry-in source: the stored row of the month before, as last
    /// rolled up. A stale row is used as is until that month is rolled again.
    fn previous_summary(
        t: &Tables,
        fuel: FuelType,
        period: YearMonth,
    ) -> Option<&MonthlyStockSummary> {
        period
            .previous()
            .and_then(|prior| t.summaries.get(&(fuel, prior)))
    }

    fn compute(
        t: &Tables,
        fuel: FuelType,
        period: YearMonth,
    ) -> Result<MonthlyStockSummary, StockError> {
        MonthlyRollup::compute(
            fuel,
            period,
            Self::previous_summary(t, fuel, period),
            t.summaries.get(&(fuel, period)),
            t.fuel_batches(fuel),
            t.depletions.iter().filter(|d| d.fuel == fuel),
            Utc::now(),
        )
    }

    /// Stored summary for a month, if rolled up.
    pub fn summary(
        &self,
        fuel: FuelType,
        year: i32,
        month: u32,
    ) -> Result<Option<MonthlyStockSummary>, StockError> {
        let period = YearMonth::new(year, month)?;
        Ok(self
            .store
            .read(|t| t.summaries.get(&(fuel, period)).cloned())?)
    }

    /// Every stored summary of a fuel, oldest month first.
    pub fn summaries(&self, fuel: FuelType) -> Result<Vec<MonthlyStockSummary>, StockError> {
        Ok(self.store.read(|t| {
            t.summaries
                .iter()
                .filter(|((f, _), _)| *f == fuel)
                .map(|(_, s)| s.clone())
                .collect()
        })?)
    }

    /// Batches of a fuel in FIFO order.
    pub fn batches(&self, fuel: FuelType) -> Result<Vec<FuelInvoiceBatch>, StockError> {
        Ok(self.position(fuel)?.batches)
    }

    /// Current ledger position of a fuel.
    pub fn position(&self, fuel: FuelType) -> Result<LedgerPosition, StockError> {
        Ok(self.store.read(|t| {
            let depletions: Vec<StockDepletion> = t
                .depletions
                .iter()
                .filter(|d| d.fuel == fuel)
                .cloned()
                .collect();
            LedgerPosition::new(fuel, t.fuel_batches(fuel).cloned().collect(), &depletions)
        })?)
    }

    /// Depletion history of a fuel, oldest first.
    pub fn depletions(&self, fuel: FuelType) -> Result<Vec<StockDepletion>, StockError> {
        Ok(self.store.read(|t| {
            t.depletions
                .iter()
                .filter(|d| d.fuel == fuel)
                .cloned()
                .collect()
        })?)
    }

    /// Depletions caused by one shift's approval.
    pub fn depletions_for_shift(&self, shift_id: ShiftId) -> Result<Vec<StockDepletion>, StockError> {
        Ok(self.store.read(|t| {
            t.depletions
                .iter()
                .filter(|d| d.shift_id == shift_id)
                .cloned()
                .collect()
        })?)
    }

    /// Fails when the store can no longer serve reads.
    pub fn ping(&self) -> Result<(), StockError> {
        Ok(self.store.read(|_| ())?)
    }
}
