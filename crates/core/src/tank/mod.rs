//! Tank inventory reconciliation.
//!
//! Physical consumption (`start + delivered - end`) is compared with the
//! litres sold through the nozzles the tank feeds. No tiering is applied.

pub mod reconciler;
pub mod types;

pub use reconciler::TankReconciler;
pub use types::{TankInventorySnapshot, TankReading};
