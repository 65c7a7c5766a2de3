//! FIFO depletion planning.
//!
//! Planning is pure: it reads batches and returns a plan. Applying checks the
//! whole plan against the batches before touching any of them, so a failed
//! apply leaves every batch as it was.

use fuelbook_shared::types::InvoiceBatchId;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::error::StockError;
use super::types::{DepletionPlan, DepletionSlice, FuelInvoiceBatch};
use crate::catalog::FuelType;

/// Stateless FIFO planner.
pub struct FifoPlanner;

impl FifoPlanner {
    /// Litres remaining across the open batches of a fuel.
    #[must_use]
    pub fn available<'a>(
        fuel: FuelType,
        batches: impl IntoIterator<Item = &'a FuelInvoiceBatch>,
    ) -> Decimal {
        batches
            .into_iter()
            .filter(|b| b.fuel == fuel && !b.completed)
            .map(|b| b.remaining)
            .sum()
    }

    /// Plans the depletion of `quantity` litres of `fuel`, oldest invoice first.
    ///
    /// A zero quantity yields an empty plan. The plan covers the full
    /// quantity or the call fails with `InsufficientStock`.
    pub fn plan<'a>(
        fuel: FuelType,
        batches: impl IntoIterator<Item = &'a FuelInvoiceBatch>,
        quantity: Decimal,
    ) -> Result<DepletionPlan, StockError> {
        if quantity < Decimal::ZERO {
            return Err(StockError::InvalidQuantity(quantity));
        }

        let mut open: Vec<&FuelInvoiceBatch> = batches
            .into_iter()
            .filter(|b| b.fuel == fuel && !b.completed && b.remaining > Decimal::ZERO)
            .collect();
        open.sort_by_key(|b| b.fifo_key());

        let available: Decimal = open.iter().map(|b| b.remaining).sum();
        if available < quantity {
            return Err(StockError::InsufficientStock {
                fuel,
                requested: quantity,
                available,
            });
        }

        let mut outstanding = quantity;
        let mut slices = Vec::new();
        for batch in open {
            if outstanding.is_zero() {
                break;
            }
            let take = outstanding.min(batch.remaining);
            outstanding -= take;
            slices.push(DepletionSlice {
                batch_id: batch.id,
                invoice_number: batch.invoice_number.clone(),
                invoice_date: batch.invoice_date,
                quantity: take,
                remaining_after: batch.remaining - take,
            });
        }

        Ok(DepletionPlan {
            fuel,
            requested: quantity,
            slices,
        })
    }

    /// Applies a plan to the batches it was computed from.
    ///
    /// Fails with `ConcurrencyConflict` if any batch is missing or no longer
    /// holds the planned litres; nothing is modified in that case.
    pub fn apply<'a>(
        batches: impl IntoIterator<Item = &'a mut FuelInvoiceBatch>,
        plan: &DepletionPlan,
    ) -> Result<(), StockError> {
        let mut by_id: HashMap<InvoiceBatchId, &mut FuelInvoiceBatch> =
            batches.into_iter().map(|b| (b.id, b)).collect();

        Self::check(&by_id, plan)?;

        for slice in &plan.slices {
            if let Some(batch) = by_id.get_mut(&slice.batch_id) {
                batch.remaining -= slice.quantity;
                if batch.remaining.is_zero() {
                    batch.completed = true;
                }
            }
        }
        Ok(())
    }

    fn check(
        batches: &HashMap<InvoiceBatchId, &mut FuelInvoiceBatch>,
        plan: &DepletionPlan,
    ) -> Result<(), StockError> {
        for slice in &plan.slices {
            let batch = batches.get(&slice.batch_id).ok_or_else(|| {
                StockError::ConcurrencyConflict(format!("batch {} vanished", slice.batch_id))
            })?;
            if batch.fuel != plan.fuel || batch.completed || batch.remaining < slice.quantity {
                return Err(StockError::ConcurrencyConflict(format!(
                    "batch {} changed since planning",
                    slice.invoice_number
                )));
            }
        }
        Ok(())
    }
}
