//! Collection reconciliation: system sales against cash-office slips.
//!
//! The verdict is driven only by the grand totals. Per-method rows are for
//! reports; automation rarely reports tender type, so most system sales sit in
//! the `Unclassified` bucket and method rows do not line up one to one.

pub mod engine;
pub mod types;

#[cfg(test)]
mod engine_props;

pub use engine::ReconciliationEngine;
pub use types::{
    CashSlip, CreditCardDetail, CreditSale, OtherPayment, OtherPaymentKind, PaymentMethodRow,
    ReconciliationResult, ReconciliationThresholds, ReconciliationVerdict,
};
