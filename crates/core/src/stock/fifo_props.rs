//! Property tests for FIFO depletion.

use chrono::NaiveDate;
use fuelbook_shared::types::ShiftId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::catalog::FuelType;
use crate::stock::error::StockError;
use crate::stock::fifo::FifoPlanner;
use crate::stock::types::{FuelInvoiceBatch, StockDepletion};

/// Batches with distinct, increasing invoice dates and 0.1-1000.0 L each.
fn arb_batches() -> impl Strategy<Value = Vec<FuelInvoiceBatch>> {
    prop::collection::vec(1i64..10_000, 1..8).prop_map(|tenths| {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        tenths
            .into_iter()
            .enumerate()
            .map(|(i, q)| {
                let days = u64::try_from(i).unwrap();
                let date = start + chrono::Days::new(days);
                FuelInvoiceBatch::new(
                    FuelType::Diesel,
                    format!("INV-{i}"),
                    date,
                    Decimal::new(q, 1),
                    u64::try_from(i).unwrap(),
                )
            })
            .rev()
            .collect()
    })
}

/// Depletion requests in tenths of a litre.
fn arb_requests() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec((0i64..5_000).prop_map(|t| Decimal::new(t, 1)), 1..6)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A later invoice is only touched once every earlier one is exhausted.
    #[test]
    fn prop_fifo_order_preserved(mut batches in arb_batches(), requests in arb_requests()) {
        for quantity in requests {
            if let Ok(plan) = FifoPlanner::plan(FuelType::Diesel, &batches, quantity) {
                FifoPlanner::apply(batches.iter_mut(), &plan).unwrap();
            }

            let mut ordered: Vec<&FuelInvoiceBatch> = batches.iter().collect();
            ordered.sort_by_key(|b| b.fifo_key());
            let last_touched = ordered.iter().rposition(|b| b.remaining < b.quantity);
            if let Some(last) = last_touched {
                for earlier in &ordered[..last] {
                    prop_assert!(earlier.completed);
                    prop_assert_eq!(earlier.remaining, Decimal::ZERO);
                }
            }
        }
    }

    /// Remaining plus depleted always equals invoiced.
    #[test]
    fn prop_ledger_conservation(mut batches in arb_batches(), requests in arb_requests()) {
        let invoiced: Decimal = batches.iter().map(|b| b.quantity).sum();
        let mut history: Vec<StockDepletion> = Vec::new();
        let shift = ShiftId::new();
        let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        for quantity in requests {
            if let Ok(plan) = FifoPlanner::plan(FuelType::Diesel, &batches, quantity) {
                FifoPlanner::apply(batches.iter_mut(), &plan).unwrap();
                history.extend(plan.to_depletions(shift, day, chrono::Utc::now()));
            }
            let remaining: Decimal = batches.iter().map(|b| b.remaining).sum();
            let depleted: Decimal = history.iter().map(|d| d.quantity).sum();
            prop_assert_eq!(remaining + depleted, invoiced);
            prop_assert!(batches.iter().all(|b| b.remaining >= Decimal::ZERO));
        }
    }

    /// Asking for more than is available fails and changes nothing.
    #[test]
    fn prop_insufficient_stock_is_atomic(batches in arb_batches(), extra in 1i64..1_000) {
        let available = FifoPlanner::available(FuelType::Diesel, &batches);
        let before = batches.clone();
        let requested = available + Decimal::new(extra, 1);

        let result = FifoPlanner::plan(FuelType::Diesel, &batches, requested);
        let is_insufficient = matches!(result, Err(StockError::InsufficientStock { .. }));
        prop_assert!(is_insufficient);
        prop_assert_eq!(batches, before);
    }
}
