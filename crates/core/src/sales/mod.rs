//! Sale records reported for a shift and their aggregation.
//!
//! # Modules
//!
//! - `types` - Automation, fleet and market sale records, pump meter readings
//! - `aggregator` - Per-fuel, per-nozzle, per-payment-method and per-attendant sums
//! - `pump` - Pump meter delta versus summed sale quantities

pub mod aggregator;
pub mod pump;
pub mod types;

pub use aggregator::{
    AttendantSalesRow, FuelSalesRow, NozzleSalesRow, SalesAggregator, SalesBreakdown, SalesLine,
    SalesSummary,
};
pub use pump::{PumpIndexVariance, PumpReconciler};
pub use types::{
    AttendantId, AutomationSale, FleetSale, MarketSale, NozzleRef, PaymentMethod,
    PumpIndexReading,
};
