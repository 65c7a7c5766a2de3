//! A failed approval leaves no partial stock, archive or status change.

mod common;

use common::*;
use fuelbook_core::catalog::FuelType;
use fuelbook_core::shift::{ShiftAction, ShiftError, ShiftStatus};
use fuelbook_core::stock::StockError;
use rust_decimal_macros::dec;

#[test]
fn test_second_fuel_shortage_rolls_back_first_fuel() {
    let fx = fixture();
    fx.stock
        .record_invoice(FuelType::Diesel, "D-1", date(2026, 4, 1), dec!(1000))
        .unwrap();
    fx.stock
        .record_invoice(FuelType::Lpg, "L-1", date(2026, 4, 1), dec!(10))
        .unwrap();

    let shift = fx
        .shifts
        .import_shift(
            import(
                date(2026, 4, 2),
                vec![
                    sale("A", FuelType::Diesel, dec!(100), dec!(4000)),
                    sale("A", FuelType::Lpg, dec!(50), dec!(1000)),
                ],
            ),
            &actor("importer"),
        )
        .unwrap();
    fx.shifts
        .upsert_cash_slip(shift.id, cash_slip("A", dec!(5000)), None)
        .unwrap();
    fx.shifts.submit(shift.id, actor("cashier")).unwrap();

    let err = fx.shifts.approve(shift.id, actor("manager")).unwrap_err();
    match err {
        ShiftError::Stock(StockError::InsufficientStock {
            fuel,
            requested,
            available,
        }) => {
            assert_eq!(fuel, FuelType::Lpg);
            assert_eq!(requested, dec!(50));
            assert_eq!(available, dec!(10));
        }
        other => panic!("unexpected error: {other}"),
    }

    let after = fx.shifts.get(shift.id).unwrap();
    assert_eq!(after.status, ShiftStatus::PendingApproval);
    assert!(after.archive_id.is_none());
    assert!(matches!(
        fx.shifts.archive(shift.id),
        Err(ShiftError::ArchiveNotFound(_))
    ));

    let diesel = fx.stock.batches(FuelType::Diesel).unwrap();
    assert_eq!(diesel[0].remaining, dec!(1000));
    assert!(fx.stock.depletions_for_shift(shift.id).unwrap().is_empty());

    let last = fx.shifts.audit_trail(shift.id).unwrap().pop().unwrap();
    assert_eq!(last.action, ShiftAction::Submitted);
}

#[test]
fn test_shift_can_be_approved_after_restock() {
    let fx = fixture();
    let shift = ready_shift(&fx, date(2026, 4, 3), FuelType::Diesel, dec!(100), dec!(4000));
    fx.shifts.submit(shift.id, actor("cashier")).unwrap();

    let err = fx.shifts.approve(shift.id, actor("manager")).unwrap_err();
    assert_eq!(err.error_code(), "INSUFFICIENT_STOCK");

    fx.stock
        .record_invoice(FuelType::Diesel, "D-9", date(2026, 4, 3), dec!(100))
        .unwrap();
    let sealed = fx.shifts.approve(shift.id, actor("manager")).unwrap();
    assert!(sealed.verify());

    let batches = fx.stock.batches(FuelType::Diesel).unwrap();
    assert!(batches[0].completed);
}
