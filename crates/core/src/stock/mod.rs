//! FIFO fuel stock ledger.
//!
//! Invoices are recorded as batches and consumed oldest invoice first when a
//! shift is approved. Monthly summaries roll the movements up per fuel and
//! become immutable once locked.
//!
//! # Modules
//!
//! - `types` - Batches, depletions, plans and monthly summaries
//! - `error` - Ledger errors
//! - `fifo` - Depletion planning and application
//! - `rollup` - Monthly summary computation and locking

pub mod error;
pub mod fifo;
pub mod rollup;
pub mod types;

#[cfg(test)]
mod fifo_props;

pub use error::StockError;
pub use fifo::FifoPlanner;
pub use rollup::MonthlyRollup;
pub use types::{
    DepletionPlan, DepletionSlice, FuelInvoiceBatch, LedgerPosition, MonthlyStockSummary,
    StockDepletion, YearMonth,
};
