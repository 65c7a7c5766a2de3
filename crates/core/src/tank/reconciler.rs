//! Tank reconciler.

use rust_decimal::Decimal;

use super::types::{TankInventorySnapshot, TankReading};
use crate::sales::SalesSummary;

/// Computes tank snapshots from readings and the shift's sales.
pub struct TankReconciler;

impl TankReconciler {
    /// One snapshot per reading, ordered by tank number.
    #[must_use]
    pub fn reconcile(readings: &[TankReading], summary: &SalesSummary) -> Vec<TankInventorySnapshot> {
        let mut snapshots: Vec<_> = readings
            .iter()
            .map(|reading| Self::snapshot(reading, Self::sold_from(reading, summary)))
            .collect();
        snapshots.sort_by_key(|s| s.tank_no);
        snapshots
    }

    /// Builds a snapshot from a reading and a known sold quantity.
    #[must_use]
    pub fn snapshot(reading: &TankReading, sold_quantity: Decimal) -> TankInventorySnapshot {
        let expected_consumption = reading.expected_consumption();
        TankInventorySnapshot {
            tank_no: reading.tank_no,
            fuel: reading.fuel,
            start_volume: reading.start_volume,
            end_volume: reading.end_volume,
            delivered_volume: reading.delivered_volume,
            sold_quantity,
            expected_consumption,
            variance: expected_consumption - sold_quantity,
        }
    }

    fn sold_from(reading: &TankReading, summary: &SalesSummary) -> Decimal {
        if reading.feeds.is_empty() {
            summary.sold_quantity(reading.fuel)
        } else {
            reading
                .feeds
                .iter()
                .map(|nozzle| summary.nozzle_quantity(*nozzle))
                .sum()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FuelType;
    use crate::sales::{AutomationSale, NozzleRef, SalesAggregator};
    use chrono::Utc;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn reading(start: Decimal, delivered: Decimal, end: Decimal) -> TankReading {
        TankReading {
            tank_no: 1,
            fuel: FuelType::Diesel,
            start_volume: start,
            end_volume: end,
            delivered_volume: delivered,
            feeds: vec![],
        }
    }

    fn sale(fuel: FuelType, nozzle: NozzleRef, qty: Decimal) -> AutomationSale {
        AutomationSale {
            fuel,
            nozzle,
            quantity: qty,
            unit_price: dec!(40),
            amount: qty * dec!(40),
            sold_at: Utc::now(),
            attendant: None,
            payment_hint: None,
            loyalty_card: None,
        }
    }

    #[rstest]
    #[case::unaccounted_loss(dec!(5000), dec!(2000), dec!(4000), dec!(2900), dec!(3000), dec!(100))]
    #[case::over_reported(dec!(5000), dec!(0), dec!(4000), dec!(1010), dec!(1000), dec!(-10))]
    #[case::exact(dec!(800), dec!(0), dec!(300), dec!(500), dec!(500), dec!(0))]
    fn test_snapshot(
        #[case] start: Decimal,
        #[case] delivered: Decimal,
        #[case] end: Decimal,
        #[case] sold: Decimal,
        #[case] expected: Decimal,
        #[case] variance: Decimal,
    ) {
        let snapshot = TankReconciler::snapshot(&reading(start, delivered, end), sold);
        assert_eq!(snapshot.expected_consumption, expected);
        assert_eq!(snapshot.variance, variance);
    }

    #[test]
    fn test_sold_quantity_defaults_to_fuel_total() {
        let summary = SalesAggregator::aggregate(
            &[
                sale(FuelType::Diesel, NozzleRef::new(1, 1), dec!(1500)),
                sale(FuelType::Diesel, NozzleRef::new(2, 1), dec!(1400)),
                sale(FuelType::Lpg, NozzleRef::new(3, 1), dec!(99)),
            ],
            &[],
            &[],
        );
        let snapshots =
            TankReconciler::reconcile(&[reading(dec!(5000), dec!(2000), dec!(4000))], &summary);
        assert_eq!(snapshots[0].sold_quantity, dec!(2900));
        assert_eq!(snapshots[0].variance, dec!(100));
    }

    #[test]
    fn test_sold_quantity_follows_fed_nozzles() {
        let summary = SalesAggregator::aggregate(
            &[
                sale(FuelType::Diesel, NozzleRef::new(1, 1), dec!(600)),
                sale(FuelType::Diesel, NozzleRef::new(2, 1), dec!(400)),
            ],
            &[],
            &[],
        );
        let mut tank_one = reading(dec!(2000), dec!(0), dec!(1400));
        tank_one.feeds = vec![NozzleRef::new(1, 1)];
        let mut tank_two = reading(dec!(2000), dec!(0), dec!(1590));
        tank_two.tank_no = 2;
        tank_two.feeds = vec![NozzleRef::new(2, 1)];

        let snapshots = TankReconciler::reconcile(&[tank_two, tank_one], &summary);
        assert_eq!(snapshots[0].tank_no, 1);
        assert_eq!(snapshots[0].variance, dec!(0));
        assert_eq!(snapshots[1].sold_quantity, dec!(400));
        assert_eq!(snapshots[1].variance, dec!(10));
    }

    #[test]
    fn test_negative_volume_detected() {
        assert!(reading(dec!(-1), dec!(0), dec!(0)).has_negative_volume());
        assert!(!reading(dec!(0), dec!(0), dec!(0)).has_negative_volume());
    }
}
