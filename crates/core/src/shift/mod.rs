//! Shift lifecycle.
//!
//! # Modules
//!
//! - `types` - Shift record, status, actions, totals and snapshots
//! - `error` - Shift errors
//! - `service` - The state machine
//! - `reconcile` - Snapshot computation from the shift's child records
//! - `audit` - Append-only audit events

pub mod audit;
pub mod error;
pub mod reconcile;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use audit::ShiftAuditEvent;
pub use error::ShiftError;
pub use reconcile::ShiftReconciler;
pub use service::ShiftStateMachine;
pub use types::{
    Actor, DeletionRequest, ReconciliationSnapshot, Shift, ShiftAction, ShiftImport, ShiftStatus,
    ShiftTotals, ShiftTransition,
};
