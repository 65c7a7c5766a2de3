//! Property tests for the reconciliation engine.

use chrono::Utc;
use fuelbook_shared::types::CashSlipId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::catalog::FuelType;
use crate::reconciliation::engine::ReconciliationEngine;
use crate::reconciliation::types::{
    CashSlip, CreditCardDetail, ReconciliationThresholds, ReconciliationVerdict,
};
use crate::sales::{AttendantId, FleetSale, NozzleRef, SalesAggregator};

/// Amounts in cents between 0 and 100_000.00.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn fleet(amount: Decimal) -> FleetSale {
    FleetSale {
        fuel: FuelType::Diesel,
        nozzle: NozzleRef::new(1, 1),
        quantity: Decimal::ONE,
        unit_price: amount,
        amount,
        sold_at: Utc::now(),
        plate: None,
        fleet_card: None,
        attendant: None,
    }
}

fn slip(cash: Decimal, card: Decimal) -> CashSlip {
    CashSlip {
        id: CashSlipId::new(),
        attendant: AttendantId::new("A"),
        attendant_name: None,
        cash,
        card_details: vec![CreditCardDetail {
            bank: "Bank".into(),
            amount: card,
        }],
        other_payments: vec![],
        credit_sales: vec![],
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The difference is exactly collections minus system sales.
    #[test]
    fn prop_difference_is_exact(
        sales in prop::collection::vec(arb_amount(), 0..10),
        cash in arb_amount(),
        card in arb_amount(),
    ) {
        let fleet_sales: Vec<_> = sales.iter().copied().map(fleet).collect();
        let summary = SalesAggregator::aggregate(&[], &fleet_sales, &[]);
        let slips = [slip(cash, card)];
        let result = ReconciliationEngine::reconcile(
            &summary,
            &slips,
            &ReconciliationThresholds::default(),
        );

        let system: Decimal = sales.iter().copied().sum();
        prop_assert_eq!(result.system_total, system);
        prop_assert_eq!(result.collections_total, cash + card);
        prop_assert_eq!(result.difference, cash + card - system);
    }

    /// Shrinking |diff| with a fixed system total never worsens the verdict.
    #[test]
    fn prop_tiering_is_monotonic(
        system in arb_amount(),
        diff in (-5_000_000i64..5_000_000).prop_map(|c| Decimal::new(c, 2)),
        shrink_percent in 0i64..=100,
    ) {
        let thresholds = ReconciliationThresholds::default();
        let smaller = diff * Decimal::new(shrink_percent, 2);

        let wide = ReconciliationEngine::classify(diff, system, &thresholds);
        let narrow = ReconciliationEngine::classify(smaller, system, &thresholds);
        prop_assert!(narrow <= wide);
    }

    /// Gaps under one currency unit are always balanced.
    #[test]
    fn prop_small_gap_is_balanced(
        system in arb_amount(),
        cents in -99i64..=99,
    ) {
        let verdict = ReconciliationEngine::classify(
            Decimal::new(cents, 2),
            system,
            &ReconciliationThresholds::default(),
        );
        prop_assert_eq!(verdict, ReconciliationVerdict::Balanced);
    }
}
