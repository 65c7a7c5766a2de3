//! Fixtures shared by the store integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use fuelbook_core::catalog::FuelType;
use fuelbook_core::reconciliation::CashSlip;
use fuelbook_core::sales::{AttendantId, AutomationSale, NozzleRef};
use fuelbook_core::shift::{Actor, Shift, ShiftImport};
use fuelbook_shared::ReconciliationConfig;
use fuelbook_shared::types::{CashSlipId, StationId, UserId};
use fuelbook_store::{ShiftRepository, StockRepository, Store};
use rust_decimal::Decimal;
use std::sync::Arc;

pub struct Fixture {
    pub shifts: ShiftRepository,
    pub stock: StockRepository,
}

pub fn fixture() -> Fixture {
    let store = Arc::new(Store::new());
    Fixture {
        shifts: ShiftRepository::new(Arc::clone(&store), ReconciliationConfig::default()),
        stock: StockRepository::new(store),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Shift close time in the middle of the given day.
pub fn closing(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_hms_opt(16, 0, 0).unwrap())
}

pub fn actor(name: &str) -> Actor {
    Actor::named(UserId::new(), name)
}

pub fn sale(attendant: &str, fuel: FuelType, litres: Decimal, amount: Decimal) -> AutomationSale {
    AutomationSale {
        fuel,
        nozzle: NozzleRef::new(1, 1),
        quantity: litres,
        unit_price: amount / litres,
        amount,
        sold_at: Utc::now(),
        attendant: Some(AttendantId::new(attendant)),
        payment_hint: None,
        loyalty_card: None,
    }
}

pub fn import(day: NaiveDate, sales: Vec<AutomationSale>) -> ShiftImport {
    let closed_at = closing(day);
    ShiftImport {
        station_id: StationId::new(),
        opened_at: closed_at - Duration::hours(8),
        closed_at,
        automation_sales: sales,
        fleet_sales: vec![],
        market_sales: vec![],
    }
}

pub fn cash_slip(attendant: &str, cash: Decimal) -> CashSlip {
    CashSlip {
        id: CashSlipId::new(),
        attendant: AttendantId::new(attendant),
        attendant_name: None,
        cash,
        card_details: vec![],
        other_payments: vec![],
        credit_sales: vec![],
    }
}

/// Imports a shift selling `litres` of `fuel` for `amount`, with a matching slip.
pub fn ready_shift(
    fx: &Fixture,
    day: NaiveDate,
    fuel: FuelType,
    litres: Decimal,
    amount: Decimal,
) -> Shift {
    let shift = fx
        .shifts
        .import_shift(import(day, vec![sale("A", fuel, litres, amount)]), &actor("importer"))
        .unwrap();
    fx.shifts
        .upsert_cash_slip(shift.id, cash_slip("A", amount), None)
        .unwrap()
}
