//! Monthly stock rollup and locking.

use chrono::{DateTime, Utc};
use fuelbook_shared::types::UserId;
use rust_decimal::Decimal;

use super::error::StockError;
use super::types::{FuelInvoiceBatch, MonthlyStockSummary, StockDepletion, YearMonth};
use crate::catalog::FuelType;

/// Stateless monthly summary computation.
pub struct MonthlyRollup;

impl MonthlyRollup {
    /// Computes the summary of `fuel` for `period`.
    ///
    /// `previous` is the prior month's summary, if any; `existing` is the
    /// current row for the period, if any. A locked `existing` row is never
    /// recomputed.
    pub fn compute<'a>(
        fuel: FuelType,
        period: YearMonth,
        previous: Option<&MonthlyStockSummary>,
        existing: Option<&MonthlyStockSummary>,
        batches: impl IntoIterator<Item = &'a FuelInvoiceBatch>,
        depletions: impl IntoIterator<Item = &'a StockDepletion>,
        at: DateTime<Utc>,
    ) -> Result<MonthlyStockSummary, StockError> {
        Self::ensure_unlocked(existing, fuel, period)?;

        let carry_in = previous.map_or(Decimal::ZERO, |p| p.remaining_stock);
        let month_in: Decimal = batches
            .into_iter()
            .filter(|b| b.fuel == fuel && period.contains(b.invoice_date))
            .map(|b| b.quantity)
            .sum();
        let month_out: Decimal = depletions
            .into_iter()
            .filter(|d| d.fuel == fuel && period.contains(d.sale_date))
            .map(|d| d.quantity)
            .sum();

        Ok(MonthlyStockSummary {
            fuel,
            period,
            carry_in,
            month_in,
            month_out,
            remaining_stock: carry_in + month_in - month_out,
            locked: false,
            locked_by: None,
            locked_at: None,
            computed_at: at,
        })
    }

    /// Returns a locked copy of the summary.
    pub fn lock(
        summary: &MonthlyStockSummary,
        actor: UserId,
        at: DateTime<Utc>,
    ) -> Result<MonthlyStockSummary, StockError> {
        Self::ensure_unlocked(Some(summary), summary.fuel, summary.period)?;
        Ok(MonthlyStockSummary {
            locked: true,
            locked_by: Some(actor),
            locked_at: Some(at),
            ..summary.clone()
        })
    }

    /// Fails when stock moved before `period` but `previous` was never stored.
    ///
    /// The carry-in is read from the stored previous row only, so a month
    /// is not locked on top of a carry-in that would silently read as zero.
    pub fn ensure_carry_in_known<'a>(
        fuel: FuelType,
        period: YearMonth,
        previous: Option<&MonthlyStockSummary>,
        batches: impl IntoIterator<Item = &'a FuelInvoiceBatch>,
        depletions: impl IntoIterator<Item = &'a StockDepletion>,
    ) -> Result<(), StockError> {
        let Some(prior) = period.previous() else {
            return Ok(());
        };
        if previous.is_some() {
            return Ok(());
        }
        let earlier_in = batches
            .into_iter()
            .any(|b| b.fuel == fuel && YearMonth::of(b.invoice_date) < period);
        let earlier_out = depletions
            .into_iter()
            .any(|d| d.fuel == fuel && YearMonth::of(d.sale_date) < period);
        if earlier_in || earlier_out {
            return Err(StockError::PreviousMonthNotRolledUp {
                fuel,
                year: prior.year,
                month: prior.month,
            });
        }
        Ok(())
    }

    /// Fails with `MonthLocked` when the row exists and is locked.
    pub fn ensure_unlocked(
        existing: Option<&MonthlyStockSummary>,
        fuel: FuelType,
        period: YearMonth,
    ) -> Result<(), StockError> {
        match existing {
            Some(summary) if summary.locked => Err(StockError::MonthLocked {
                fuel,
                year: period.year,
                month: period.month,
            }),
            _ => Ok(()),
        }
    }
}
