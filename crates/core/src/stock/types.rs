//! Stock ledger types.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use fuelbook_shared::types::{DepletionId, InvoiceBatchId, ShiftId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::StockError;
use crate::catalog::FuelType;

/// A fuel invoice and what is left of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelInvoiceBatch {
    /// Batch id.
    pub id: InvoiceBatchId,
    /// Fuel received.
    pub fuel: FuelType,
    /// Supplier invoice number, unique per fuel.
    pub invoice_number: String,
    /// Invoice date, the FIFO key.
    pub invoice_date: NaiveDate,
    /// Litres received.
    pub quantity: Decimal,
    /// Litres not yet depleted. Never negative, never increases.
    pub remaining: Decimal,
    /// Set once `remaining` reaches zero.
    pub completed: bool,
    /// Insertion order, breaks ties between invoices of the same date.
    pub sequence: u64,
    /// When the invoice was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl FuelInvoiceBatch {
    /// Creates an untouched batch.
    #[must_use]
    pub fn new(
        fuel: FuelType,
        invoice_number: impl Into<String>,
        invoice_date: NaiveDate,
        quantity: Decimal,
        sequence: u64,
    ) -> Self {
        Self {
            id: InvoiceBatchId::new(),
            fuel,
            invoice_number: invoice_number.into(),
            invoice_date,
            quantity,
            remaining: quantity,
            completed: false,
            sequence,
            recorded_at: Utc::now(),
        }
    }

    /// Depletion order key.
    #[must_use]
    pub fn fifo_key(&self) -> (NaiveDate, u64) {
        (self.invoice_date, self.sequence)
    }
}

/// Litres taken from one batch by a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDepletion {
    /// Depletion id.
    pub id: DepletionId,
    /// Batch depleted.
    pub batch_id: InvoiceBatchId,
    /// Fuel depleted.
    pub fuel: FuelType,
    /// Shift whose approval caused the depletion.
    pub shift_id: ShiftId,
    /// Litres taken.
    pub quantity: Decimal,
    /// Business date of the sales, used for monthly attribution.
    pub sale_date: NaiveDate,
    /// When the depletion was committed.
    pub depleted_at: DateTime<Utc>,
}

/// One step of a depletion plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepletionSlice {
    /// Batch to take from.
    pub batch_id: InvoiceBatchId,
    /// Invoice number of the batch.
    pub invoice_number: String,
    /// Invoice date of the batch.
    pub invoice_date: NaiveDate,
    /// Litres to take.
    pub quantity: Decimal,
    /// Litres left in the batch afterwards.
    pub remaining_after: Decimal,
}

impl DepletionSlice {
    /// Whether the slice empties its batch.
    #[must_use]
    pub fn completes_batch(&self) -> bool {
        self.remaining_after.is_zero()
    }
}

/// A computed, not yet applied, FIFO depletion for one fuel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepletionPlan {
    /// Fuel to deplete.
    pub fuel: FuelType,
    /// Litres requested.
    pub requested: Decimal,
    /// Slices in FIFO order.
    pub slices: Vec<DepletionSlice>,
}

impl DepletionPlan {
    /// Litres covered by the slices.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.slices.iter().map(|s| s.quantity).sum()
    }

    /// Depletion records for the plan.
    #[must_use]
    pub fn to_depletions(
        &self,
        shift_id: ShiftId,
        sale_date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Vec<StockDepletion> {
        self.slices
            .iter()
            .map(|slice| StockDepletion {
                id: DepletionId::new(),
                batch_id: slice.batch_id,
                fuel: self.fuel,
                shift_id,
                quantity: slice.quantity,
                sale_date,
                depleted_at: at,
            })
            .collect()
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
}

impl YearMonth {
    /// Creates a validated month. The year must be one a calendar date can carry.
    pub fn new(year: i32, month: u32) -> Result<Self, StockError> {
        match NaiveDate::from_ymd_opt(year, month, 1) {
            Some(_) => Ok(Self { year, month }),
            None => Err(StockError::InvalidMonth { year, month }),
        }
    }

    /// The month a date falls in.
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month before this one, `None` below the earliest representable year.
    #[must_use]
    pub fn previous(self) -> Option<Self> {
        if self.month == 1 {
            self.year.checked_sub(1).map(|year| Self { year, month: 12 })
        } else {
            Some(Self {
                year: self.year,
                month: self.month - 1,
            })
        }
    }

    /// Whether a date falls in this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Stock movements of one fuel over one month.
///
/// Unique per (fuel, period). Immutable once `locked` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStockSummary {
    /// Fuel.
    pub fuel: FuelType,
    /// Month covered.
    pub period: YearMonth,
    /// Previous month's remaining stock, zero if none.
    pub carry_in: Decimal,
    /// Litres invoiced in the month.
    pub month_in: Decimal,
    /// Litres depleted for sales dated in the month.
    pub month_out: Decimal,
    /// `carry_in + month_in - month_out`.
    pub remaining_stock: Decimal,
    /// Set once the month is closed.
    pub locked: bool,
    /// Who locked the month.
    pub locked_by: Option<UserId>,
    /// When the month was locked.
    pub locked_at: Option<DateTime<Utc>>,
    /// When the figures were computed.
    pub computed_at: DateTime<Utc>,
}

/// Current stock position of a fuel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerPosition {
    /// Fuel.
    pub fuel: FuelType,
    /// Every batch, FIFO order.
    pub batches: Vec<FuelInvoiceBatch>,
    /// Sum of invoice quantities.
    pub total_invoiced: Decimal,
    /// Sum of remaining quantities.
    pub total_remaining: Decimal,
    /// Sum of historical depletions.
    pub total_depleted: Decimal,
}

impl LedgerPosition {
    /// Builds the position from batches and depletions of one fuel.
    #[must_use]
    pub fn new(
        fuel: FuelType,
        mut batches: Vec<FuelInvoiceBatch>,
        depletions: &[StockDepletion],
    ) -> Self {
        batches.sort_by_key(FuelInvoiceBatch::fifo_key);
        Self {
            fuel,
            total_invoiced: batches.iter().map(|b| b.quantity).sum(),
            total_remaining: batches.iter().map(|b| b.remaining).sum(),
            total_depleted: depletions.iter().map(|d| d.quantity).sum(),
            batches,
        }
    }

    /// Whether remaining plus depleted equals invoiced.
    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.total_remaining + self.total_depleted == self.total_invoiced
    }
}
