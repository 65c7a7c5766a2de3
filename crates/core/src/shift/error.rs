//! Shift lifecycle errors.

use fuelbook_shared::types::ShiftId;
use thiserror::Error;

use crate::catalog::UnknownFuel;
use crate::sales::{AttendantId, NozzleRef};
use crate::shift::types::ShiftStatus;
use crate::stock::StockError;

/// Errors that can occur during shift operations.
#[derive(Debug, Error)]
pub enum ShiftError {
    /// Transition not legal from the current status.
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current status.
        from: ShiftStatus,
        /// Attempted status.
        to: ShiftStatus,
    },

    /// Attendants with automation sales have no cash slip.
    #[error("Cash slips missing for attendants: {}", join(.missing_attendants))]
    IncompleteReconciliation {
        /// Attendants without a slip, sorted.
        missing_attendants: Vec<AttendantId>,
    },

    /// Shift not found.
    #[error("Shift {0} not found")]
    ShiftNotFound(ShiftId),

    /// Archived report not found.
    #[error("No archived report for shift {0}")]
    ArchiveNotFound(ShiftId),

    /// Child records cannot change in the current status.
    #[error("Shift {id} is locked while {status}")]
    ShiftLocked {
        /// Shift id.
        id: ShiftId,
        /// Current status.
        status: ShiftStatus,
    },

    /// A reason is required for this action.
    #[error("Reason is required")]
    ReasonRequired,

    /// Deletion must be confirmed by someone other than the requester.
    #[error("Deletion must be confirmed by a different user than the requester")]
    SameApprover,

    /// Pump meter went backwards.
    #[error("Pump reading for {nozzle} ends below its start index")]
    InvalidPumpReading {
        /// Offending nozzle.
        nozzle: NozzleRef,
    },

    /// Tank reading has a negative volume.
    #[error("Tank {tank_no} reading has a negative volume")]
    InvalidTankReading {
        /// Offending tank.
        tank_no: u16,
    },

    /// Cash slip has a negative amount.
    #[error("Cash slip for {0} has a negative amount")]
    InvalidCashSlip(AttendantId),

    /// Import batch is inconsistent.
    #[error("Invalid import: {0}")]
    InvalidImport(String),

    /// Fuel name not in the catalog.
    #[error(transparent)]
    UnknownFuel(#[from] UnknownFuel),

    /// Ledger failure during approval.
    #[error(transparent)]
    Stock(#[from] StockError),

    /// The shift changed since the caller read it.
    #[error("Shift version conflict: expected {expected}, found {actual}")]
    ConcurrencyConflict {
        /// Version the caller expected.
        expected: u64,
        /// Current version.
        actual: u64,
    },

    /// Archive could not be produced.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

fn join(attendants: &[AttendantId]) -> String {
    attendants
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl ShiftError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::ReasonRequired
            | Self::InvalidPumpReading { .. }
            | Self::InvalidTankReading { .. }
            | Self::InvalidCashSlip(_)
            | Self::InvalidImport(_)
            | Self::UnknownFuel(_) => 400,

            Self::ShiftNotFound(_) | Self::ArchiveNotFound(_) => 404,

            Self::InvalidStateTransition { .. }
            | Self::ShiftLocked { .. }
            | Self::ConcurrencyConflict { .. } => 409,

            Self::IncompleteReconciliation { .. } | Self::SameApprover => 422,

            Self::Stock(err) => err.status_code(),

            Self::Archive(_) | Self::Storage(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidStateTransition { .. } => "INVALID_STATE_TRANSITION",
            Self::IncompleteReconciliation { .. } => "INCOMPLETE_RECONCILIATION",
            Self::ShiftNotFound(_) => "SHIFT_NOT_FOUND",
            Self::ArchiveNotFound(_) => "ARCHIVE_NOT_FOUND",
            Self::ShiftLocked { .. } => "SHIFT_LOCKED",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::SameApprover => "SAME_APPROVER",
            Self::InvalidPumpReading { .. } => "INVALID_PUMP_READING",
            Self::InvalidTankReading { .. } => "INVALID_TANK_READING",
            Self::InvalidCashSlip(_) => "INVALID_CASH_SLIP",
            Self::InvalidImport(_) => "INVALID_IMPORT",
            Self::UnknownFuel(_) => "UNKNOWN_FUEL",
            Self::Stock(err) => err.error_code(),
            Self::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            Self::Archive(_) => "ARCHIVE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }
}
