//! Core business logic for Fuelbook.
//!
//! This crate contains pure business logic with ZERO web or storage dependencies.
//! All domain types, reconciliation rules, and ledger calculations live here.
//!
//! # Modules
//!
//! - `catalog` - Fuel products and external name resolution
//! - `sales` - Automation/fleet/market sale records and aggregation
//! - `reconciliation` - Cash slips versus system sales, tiered verdicts
//! - `tank` - Tank volume reconciliation
//! - `stock` - FIFO invoice depletion and monthly stock summaries
//! - `shift` - Shift lifecycle state machine and reconciliation snapshots
//! - `archive` - Denormalized, sealed shift reports

pub mod archive;
pub mod catalog;
pub mod reconciliation;
pub mod sales;
pub mod shift;
pub mod stock;
pub mod tank;
