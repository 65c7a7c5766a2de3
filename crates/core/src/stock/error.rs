//! Stock ledger errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::FuelType;

/// Errors raised by the fuel stock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    /// Open batches cannot cover the requested depletion.
    #[error("Insufficient {fuel} stock: requested {requested} L, available {available} L")]
    InsufficientStock {
        /// Fuel being depleted.
        fuel: FuelType,
        /// Litres requested.
        requested: Decimal,
        /// Litres remaining across open batches.
        available: Decimal,
    },

    /// Invoice number already recorded for the fuel.
    #[error("Invoice {invoice_number} already recorded for {fuel}")]
    DuplicateInvoice {
        /// Fuel of the invoice.
        fuel: FuelType,
        /// Duplicated invoice number.
        invoice_number: String,
    },

    /// The monthly summary is locked.
    #[error("Stock month {year}-{month:02} is locked for {fuel}")]
    MonthLocked {
        /// Fuel of the summary.
        fuel: FuelType,
        /// Calendar year.
        year: i32,
        /// Calendar month, 1-12.
        month: u32,
    },

    /// Earlier activity exists but the previous month has no stored summary.
    #[error("Stock month {year}-{month:02} must be rolled up for {fuel} first")]
    PreviousMonthNotRolledUp {
        /// Fuel of the summary.
        fuel: FuelType,
        /// Year of the missing summary.
        year: i32,
        /// Month of the missing summary.
        month: u32,
    },

    /// Quantity must be positive.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(Decimal),

    /// Month outside 1-12.
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth {
        /// Year given.
        year: i32,
        /// Month given.
        month: u32,
    },

    /// The ledger moved between planning and applying a depletion.
    #[error("Concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StockError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidQuantity(_) | Self::InvalidMonth { .. } => 400,
            Self::DuplicateInvoice { .. }
            | Self::MonthLocked { .. }
            | Self::PreviousMonthNotRolledUp { .. }
            | Self::ConcurrencyConflict(_) => 409,
            Self::InsufficientStock { .. } => 422,
            Self::Storage(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::DuplicateInvoice { .. } => "DUPLICATE_INVOICE",
            Self::MonthLocked { .. } => "MONTH_LOCKED",
            Self::PreviousMonthNotRolledUp { .. } => "PREVIOUS_MONTH_NOT_ROLLED_UP",
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InvalidMonth { .. } => "INVALID_MONTH",
            Self::ConcurrencyConflict(_) => "CONCURRENCY_CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}
