//! Collection reconciliation engine.

use fuelbook_shared::types::{percent_of, round_money};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

use super::types::{
    CashSlip, PaymentMethodRow, ReconciliationResult, ReconciliationThresholds,
    ReconciliationVerdict,
};
use crate::sales::{AttendantId, PaymentMethod, SalesSummary};

/// Stateless reconciliation of system sales against collections.
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// Reconciles a sales summary against the shift's cash slips.
    #[must_use]
    pub fn reconcile<'a>(
        summary: &SalesSummary,
        slips: impl IntoIterator<Item = &'a CashSlip>,
        thresholds: &ReconciliationThresholds,
    ) -> ReconciliationResult {
        let slips: Vec<&CashSlip> = slips.into_iter().collect();
        let system_total = summary.system_total();
        let collections_total = Self::collections_total(slips.iter().copied());
        let difference = collections_total - system_total;
        let percent = percent_of(difference, system_total);

        ReconciliationResult {
            system_total,
            collections_total,
            difference,
            difference_percent: round_money(percent),
            verdict: Self::tier(difference, percent, thresholds),
            method_rows: Self::method_rows(summary, &slips),
            slip_count: slips.len(),
        }
    }

    /// Sum of every slip total.
    #[must_use]
    pub fn collections_total<'a>(slips: impl IntoIterator<Item = &'a CashSlip>) -> Decimal {
        slips.into_iter().map(CashSlip::total).sum()
    }

    /// Classifies a difference against system sales.
    ///
    /// A non-positive system total yields a zero percentage, so any gap at or
    /// above the balanced tolerance is then a minor discrepancy.
    #[must_use]
    pub fn classify(
        difference: Decimal,
        system_total: Decimal,
        thresholds: &ReconciliationThresholds,
    ) -> ReconciliationVerdict {
        Self::tier(difference, percent_of(difference, system_total), thresholds)
    }

    fn tier(
        difference: Decimal,
        percent: Decimal,
        thresholds: &ReconciliationThresholds,
    ) -> ReconciliationVerdict {
        if difference.abs() < thresholds.balanced_tolerance {
            ReconciliationVerdict::Balanced
        } else if percent.abs() < thresholds.minor_percent {
            ReconciliationVerdict::MinorDiscrepancy
        } else {
            ReconciliationVerdict::CriticalDiscrepancy
        }
    }

    /// Attendants with sales but no slip, sorted.
    #[must_use]
    pub fn missing_slips<'a>(
        attendants: impl IntoIterator<Item = &'a AttendantId>,
        slips: impl IntoIterator<Item = &'a CashSlip>,
    ) -> Vec<AttendantId> {
        let covered: BTreeSet<&AttendantId> = slips.into_iter().map(|s| &s.attendant).collect();
        attendants
            .into_iter()
            .filter(|a| !covered.contains(a))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }

    fn method_rows(summary: &SalesSummary, slips: &[&CashSlip]) -> Vec<PaymentMethodRow> {
        let mut collected: BTreeMap<PaymentMethod, Decimal> = BTreeMap::new();
        for slip in slips {
            *collected.entry(PaymentMethod::Cash).or_default() += slip.cash;
            for line in &slip.card_details {
                *collected.entry(PaymentMethod::Card).or_default() += line.amount;
            }
            for line in &slip.other_payments {
                *collected.entry(line.kind.method()).or_default() += line.amount;
            }
            for line in &slip.credit_sales {
                *collected.entry(PaymentMethod::CreditSale).or_default() += line.amount;
            }
        }

        let methods: BTreeSet<PaymentMethod> = summary
            .by_method
            .keys()
            .chain(collected.keys())
            .copied()
            .collect();

        methods
            .into_iter()
            .map(|method| {
                let system_amount = summary.by_method.get(&method).copied();
                let collected_amount = collected.get(&method).copied().unwrap_or_default();
                PaymentMethodRow {
                    method,
                    system_amount,
                    collected_amount,
                    difference: system_amount.map(|system| collected_amount - system),
                }
            })
            .collect()
    }
}
