//! Sales aggregation for a shift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::types::{AttendantId, AutomationSale, FleetSale, MarketSale, NozzleRef, PaymentMethod};
use crate::catalog::FuelType;

/// Litres and amount sold for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SalesLine {
    /// Litres sold.
    pub quantity: Decimal,
    /// Amount charged.
    pub amount: Decimal,
}

impl SalesLine {
    fn add(&mut self, quantity: Decimal, amount: Decimal) {
        self.quantity += quantity;
        self.amount += amount;
    }
}

/// Aggregated automation, fleet and market sales of a shift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesSummary {
    /// Sum of automation sale amounts.
    pub automation_total: Decimal,
    /// Sum of fleet sale amounts.
    pub fleet_total: Decimal,
    /// Sum of market sale amounts.
    pub market_total: Decimal,
    /// Automation + fleet per fuel.
    pub by_fuel: BTreeMap<FuelType, SalesLine>,
    /// Automation + fleet per nozzle, with the fuel last seen on it.
    pub by_nozzle: BTreeMap<NozzleRef, (FuelType, SalesLine)>,
    /// Automation + fleet amount per inferred payment bucket.
    pub by_method: BTreeMap<PaymentMethod, Decimal>,
    /// Automation + fleet amount per reported attendant.
    pub by_attendant: BTreeMap<AttendantId, Decimal>,
}

impl SalesSummary {
    /// Total sales reported by automation and fleet systems.
    #[must_use]
    pub fn system_total(&self) -> Decimal {
        self.automation_total + self.fleet_total
    }

    /// Fuel (pump) sales total; same as [`Self::system_total`].
    #[must_use]
    pub fn pump_total(&self) -> Decimal {
        self.system_total()
    }

    /// Pump plus market sales.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.pump_total() + self.market_total
    }

    /// Litres of a fuel sold in the shift.
    #[must_use]
    pub fn sold_quantity(&self, fuel: FuelType) -> Decimal {
        self.by_fuel
            .get(&fuel)
            .map_or(Decimal::ZERO, |line| line.quantity)
    }

    /// Litres sold through a nozzle.
    #[must_use]
    pub fn nozzle_quantity(&self, nozzle: NozzleRef) -> Decimal {
        self.by_nozzle
            .get(&nozzle)
            .map_or(Decimal::ZERO, |(_, line)| line.quantity)
    }

    /// Attendants that appear on at least one sale.
    #[must_use]
    pub fn attendants(&self) -> BTreeSet<&AttendantId> {
        self.by_attendant.keys().collect()
    }

    /// Row form of the summary for reports and archives.
    #[must_use]
    pub fn breakdown(&self) -> SalesBreakdown {
        SalesBreakdown {
            by_fuel: self
                .by_fuel
                .iter()
                .map(|(fuel, line)| FuelSalesRow {
                    fuel: *fuel,
                    quantity: line.quantity,
                    amount: line.amount,
                })
                .collect(),
            by_nozzle: self
                .by_nozzle
                .iter()
                .map(|(nozzle, (fuel, line))| NozzleSalesRow {
                    nozzle: *nozzle,
                    fuel: *fuel,
                    quantity: line.quantity,
                    amount: line.amount,
                })
                .collect(),
            by_attendant: self
                .by_attendant
                .iter()
                .map(|(attendant, amount)| AttendantSalesRow {
                    attendant: attendant.clone(),
                    amount: *amount,
                })
                .collect(),
        }
    }
}

/// Per-fuel row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelSalesRow {
    /// Fuel sold.
    pub fuel: FuelType,
    /// Litres sold.
    pub quantity: Decimal,
    /// Amount charged.
    pub amount: Decimal,
}

/// Per-nozzle row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NozzleSalesRow {
    /// Pump and nozzle.
    pub nozzle: NozzleRef,
    /// Fuel dispensed.
    pub fuel: FuelType,
    /// Litres sold.
    pub quantity: Decimal,
    /// Amount charged.
    pub amount: Decimal,
}

/// Per-attendant row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendantSalesRow {
    /// Attendant.
    pub attendant: AttendantId,
    /// Amount sold by the attendant.
    pub amount: Decimal,
}

/// Serializable row form of a [`SalesSummary`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesBreakdown {
    /// Sales per fuel.
    pub by_fuel: Vec<FuelSalesRow>,
    /// Sales per nozzle.
    pub by_nozzle: Vec<NozzleSalesRow>,
    /// Sales per attendant.
    pub by_attendant: Vec<AttendantSalesRow>,
}

/// Stateless aggregator over a shift's sale records.
pub struct SalesAggregator;

impl SalesAggregator {
    /// Sums sale records per shift, fuel, nozzle, payment bucket and attendant.
    #[must_use]
    pub fn aggregate(
        automation: &[AutomationSale],
        fleet: &[FleetSale],
        market: &[MarketSale],
    ) -> SalesSummary {
        let mut summary = SalesSummary::default();

        for sale in automation {
            summary.automation_total += sale.amount;
            Self::add_fuel_line(&mut summary, sale.fuel, sale.nozzle, sale.quantity, sale.amount);
            *summary.by_method.entry(sale.payment_bucket()).or_default() += sale.amount;
            if let Some(attendant) = &sale.attendant {
                *summary.by_attendant.entry(attendant.clone()).or_default() += sale.amount;
            }
        }

        for sale in fleet {
            summary.fleet_total += sale.amount;
            Self::add_fuel_line(&mut summary, sale.fuel, sale.nozzle, sale.quantity, sale.amount);
            *summary.by_method.entry(PaymentMethod::Fleet).or_default() += sale.amount;
            if let Some(attendant) = &sale.attendant {
                *summary.by_attendant.entry(attendant.clone()).or_default() += sale.amount;
            }
        }

        summary.market_total = market.iter().map(|sale| sale.amount).sum();
        summary
    }

    fn add_fuel_line(
        summary: &mut SalesSummary,
        fuel: FuelType,
        nozzle: NozzleRef,
        quantity: Decimal,
        amount: Decimal,
    ) {
        summary.by_fuel.entry(fuel).or_default().add(quantity, amount);
        let entry = summary
            .by_nozzle
            .entry(nozzle)
            .or_insert((fuel, SalesLine::default()));
        entry.0 = fuel;
        entry.1.add(quantity, amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn automation(fuel: FuelType, pump: u16, qty: Decimal, amount: Decimal, who: &str) -> AutomationSale {
        AutomationSale {
            fuel,
            nozzle: NozzleRef::new(pump, 1),
            quantity: qty,
            unit_price: dec!(40),
            amount,
            sold_at: Utc::now(),
            attendant: Some(AttendantId::new(who)),
            payment_hint: None,
            loyalty_card: None,
        }
    }

    fn fleet(fuel: FuelType, qty: Decimal, amount: Decimal) -> FleetSale {
        FleetSale {
            fuel,
            nozzle: NozzleRef::new(3, 2),
            quantity: qty,
            unit_price: dec!(41),
            amount,
            sold_at: Utc::now(),
            plate: Some("34 ABC 123".into()),
            fleet_card: Some("F-1".into()),
            attendant: None,
        }
    }

    #[test]
    fn test_system_total_is_automation_plus_fleet() {
        let summary = SalesAggregator::aggregate(
            &[
                automation(FuelType::Diesel, 1, dec!(10), dec!(400), "A"),
                automation(FuelType::Unleaded95, 2, dec!(5), dec!(210.50), "B"),
            ],
            &[fleet(FuelType::Diesel, dec!(20), dec!(820))],
            &[MarketSale {
                description: "Water".into(),
                amount: dec!(15),
                sold_at: Utc::now(),
            }],
        );

        assert_eq!(summary.automation_total, dec!(610.50));
        assert_eq!(summary.fleet_total, dec!(820));
        assert_eq!(summary.system_total(), dec!(1430.50));
        assert_eq!(summary.market_total, dec!(15));
        assert_eq!(summary.grand_total(), dec!(1445.50));
    }

    #[test]
    fn test_per_fuel_and_nozzle_quantities() {
        let summary = SalesAggregator::aggregate(
            &[
                automation(FuelType::Diesel, 1, dec!(10), dec!(400), "A"),
                automation(FuelType::Diesel, 1, dec!(2.5), dec!(100), "A"),
            ],
            &[fleet(FuelType::Diesel, dec!(20), dec!(820))],
            &[],
        );

        assert_eq!(summary.sold_quantity(FuelType::Diesel), dec!(32.5));
        assert_eq!(summary.sold_quantity(FuelType::Lpg), Decimal::ZERO);
        assert_eq!(summary.nozzle_quantity(NozzleRef::new(1, 1)), dec!(12.5));
        assert_eq!(summary.nozzle_quantity(NozzleRef::new(3, 2)), dec!(20));
    }

    #[test]
    fn test_method_buckets_and_attendants() {
        let mut card = automation(FuelType::Diesel, 1, dec!(1), dec!(40), "B");
        card.payment_hint = Some(PaymentMethod::Card);
        let summary = SalesAggregator::aggregate(
            &[automation(FuelType::Diesel, 1, dec!(1), dec!(40), "A"), card],
            &[fleet(FuelType::Diesel, dec!(1), dec!(41))],
            &[],
        );

        assert_eq!(summary.by_method[&PaymentMethod::Unclassified], dec!(40));
        assert_eq!(summary.by_method[&PaymentMethod::Card], dec!(40));
        assert_eq!(summary.by_method[&PaymentMethod::Fleet], dec!(41));
        let attendants: Vec<_> = summary.attendants().into_iter().cloned().collect();
        assert_eq!(attendants, vec![AttendantId::new("A"), AttendantId::new("B")]);
    }

    #[test]
    fn test_breakdown_rows_are_sorted() {
        let summary = SalesAggregator::aggregate(
            &[
                automation(FuelType::Lpg, 4, dec!(3), dec!(60), "A"),
                automation(FuelType::Diesel, 1, dec!(1), dec!(40), "A"),
            ],
            &[],
            &[],
        );
        let rows = summary.breakdown();
        assert_eq!(rows.by_fuel[0].fuel, FuelType::Diesel);
        assert_eq!(rows.by_fuel[1].fuel, FuelType::Lpg);
        assert_eq!(rows.by_nozzle[0].nozzle, NozzleRef::new(1, 1));
        assert_eq!(rows.by_attendant.len(), 1);
        assert_eq!(rows.by_attendant[0].amount, dec!(100));
    }

    #[test]
    fn test_empty_shift() {
        let summary = SalesAggregator::aggregate(&[], &[], &[]);
        assert_eq!(summary.system_total(), Decimal::ZERO);
        assert!(summary.breakdown().by_fuel.is_empty());
    }
}
