mod common;

use common::*;
use fuelbook_core::catalog::FuelType;
use fuelbook_core::reconciliation::ReconciliationVerdict;
use fuelbook_core::sales::{AttendantId, NozzleRef, PumpIndexReading};
use fuelbook_core::shift::{ShiftAction, ShiftError, ShiftStatus};
use fuelbook_core::tank::TankReading;
use rust_decimal_macros::dec;

#[test]
fn test_happy_path_to_approved_archive() {
    let fx = fixture();
    fx.stock
        .record_invoice(FuelType::Diesel, "INV-1", date(2026, 1, 5), dec!(1000))
        .unwrap();
    let shift = ready_shift(&fx, date(2026, 1, 10), FuelType::Diesel, dec!(100), dec!(4000));

    let snapshot = fx.shifts.submit(shift.id, actor("cashier")).unwrap();
    assert_eq!(snapshot.reconciliation.verdict, ReconciliationVerdict::Balanced);
    assert_eq!(snapshot.totals.difference, dec!(0));

    let sealed = fx.shifts.approve(shift.id, actor("manager")).unwrap();
    assert!(sealed.verify());
    assert_eq!(sealed.report.totals.pump_total, dec!(4000));
    assert_eq!(sealed.report.depletions.len(), 1);

    let approved = fx.shifts.get(shift.id).unwrap();
    assert_eq!(approved.status, ShiftStatus::Approved);
    assert!(approved.locked);
    assert_eq!(approved.archive_id, Some(sealed.report.id));
    assert_eq!(approved.approver_name.as_deref(), Some("manager"));

    let position = fx.stock.position(FuelType::Diesel).unwrap();
    assert_eq!(position.total_remaining, dec!(900));
    assert!(position.is_conserved());
}

#[test]
fn test_approve_is_idempotent() {
    let fx = fixture();
    fx.stock
        .record_invoice(FuelType::Lpg, "L-1", date(2026, 1, 1), dec!(500))
        .unwrap();
    let shift = ready_shift(&fx, date(2026, 1, 2), FuelType::Lpg, dec!(50), dec!(1000));
    fx.shifts.submit(shift.id, actor("cashier")).unwrap();

    let first = fx.shifts.approve(shift.id, actor("manager")).unwrap();
    let second = fx.shifts.approve(shift.id, actor("manager")).unwrap();
    assert_eq!(first.digest, second.digest);
    assert_eq!(fx.stock.depletions(FuelType::Lpg).unwrap().len(), 1);
    assert_eq!(fx.shifts.audit_trail(shift.id).unwrap().len(), 3);
}

#[test]
fn test_submit_requires_slip_per_attendant() {
    let fx = fixture();
    let shift = fx
        .shifts
        .import_shift(
            import(
                date(2026, 1, 3),
                vec![
                    sale("A", FuelType::Diesel, dec!(10), dec!(400)),
                    sale("B", FuelType::Diesel, dec!(10), dec!(400)),
                ],
            ),
            &actor("importer"),
        )
        .unwrap();
    fx.shifts
        .upsert_cash_slip(shift.id, cash_slip("A", dec!(400)), None)
        .unwrap();

    let err = fx.shifts.submit(shift.id, actor("cashier")).unwrap_err();
    match err {
        ShiftError::IncompleteReconciliation { missing_attendants } => {
            assert_eq!(missing_attendants, vec![AttendantId::new("B")]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fx.shifts.get(shift.id).unwrap().status, ShiftStatus::Open);
}

#[test]
fn test_reject_unlocks_and_resubmit() {
    let fx = fixture();
    let shift = ready_shift(&fx, date(2026, 1, 4), FuelType::Diesel, dec!(10), dec!(400));
    fx.shifts.submit(shift.id, actor("cashier")).unwrap();

    let err = fx
        .shifts
        .upsert_cash_slip(shift.id, cash_slip("A", dec!(1)), None)
        .unwrap_err();
    assert!(matches!(err, ShiftError::ShiftLocked { .. }));

    let rejected = fx
        .shifts
        .reject(shift.id, actor("manager"), "card total wrong")
        .unwrap();
    assert_eq!(rejected.status, ShiftStatus::Rejected);
    assert!(!rejected.locked);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("card total wrong"));

    fx.shifts
        .upsert_cash_slip(shift.id, cash_slip("A", dec!(420)), None)
        .unwrap();
    let snapshot = fx.shifts.submit(shift.id, actor("cashier")).unwrap();
    assert_eq!(snapshot.totals.difference, dec!(20));
    assert_eq!(
        snapshot.reconciliation.verdict,
        ReconciliationVerdict::CriticalDiscrepancy
    );
}

#[test]
fn test_reopen_after_rejection() {
    let fx = fixture();
    let shift = ready_shift(&fx, date(2026, 1, 4), FuelType::Diesel, dec!(10), dec!(400));
    fx.shifts.submit(shift.id, actor("cashier")).unwrap();
    fx.shifts.reject(shift.id, actor("manager"), "recount").unwrap();

    let reopened = fx.shifts.reopen(shift.id, actor("cashier")).unwrap();
    assert_eq!(reopened.status, ShiftStatus::Open);

    let err = fx.shifts.reopen(shift.id, actor("cashier")).unwrap_err();
    assert!(matches!(
        err,
        ShiftError::InvalidStateTransition {
            from: ShiftStatus::Open,
            to: ShiftStatus::Open
        }
    ));
}

#[test]
fn test_deletion_needs_second_person() {
    let fx = fixture();
    let shift = ready_shift(&fx, date(2026, 1, 5), FuelType::Diesel, dec!(10), dec!(400));
    fx.shifts.submit(shift.id, actor("cashier")).unwrap();

    let requester = actor("manager");
    fx.shifts
        .request_deletion(shift.id, requester.clone(), "imported twice")
        .unwrap();

    let err = fx.shifts.confirm_deletion(shift.id, requester).unwrap_err();
    assert!(matches!(err, ShiftError::SameApprover));

    let deleted = fx.shifts.confirm_deletion(shift.id, actor("director")).unwrap();
    assert_eq!(deleted.status, ShiftStatus::Deleted);

    let err = fx.shifts.reopen(shift.id, actor("cashier")).unwrap_err();
    assert!(matches!(err, ShiftError::InvalidStateTransition { .. }));
}

#[test]
fn test_declined_deletion_restores_status() {
    let fx = fixture();
    let shift = ready_shift(&fx, date(2026, 1, 5), FuelType::Diesel, dec!(10), dec!(400));
    fx.shifts.submit(shift.id, actor("cashier")).unwrap();
    fx.shifts
        .request_deletion(shift.id, actor("manager"), "mistake")
        .unwrap();

    let restored = fx
        .shifts
        .decline_deletion(shift.id, actor("director"), "shift is valid")
        .unwrap();
    assert_eq!(restored.status, ShiftStatus::PendingApproval);
    assert!(restored.deletion.is_none());
}

#[test]
fn test_audit_trail_records_every_transition() {
    let fx = fixture();
    fx.stock
        .record_invoice(FuelType::Diesel, "INV-1", date(2026, 1, 1), dec!(100))
        .unwrap();
    let shift = ready_shift(&fx, date(2026, 1, 5), FuelType::Diesel, dec!(10), dec!(400));
    fx.shifts.submit(shift.id, actor("cashier")).unwrap();
    fx.shifts.reject(shift.id, actor("manager"), "recount").unwrap();
    fx.shifts.submit(shift.id, actor("cashier")).unwrap();
    fx.shifts.approve(shift.id, actor("manager")).unwrap();

    let trail = fx.shifts.audit_trail(shift.id).unwrap();
    let actions: Vec<ShiftAction> = trail.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![
            ShiftAction::Imported,
            ShiftAction::Submitted,
            ShiftAction::Rejected,
            ShiftAction::Submitted,
            ShiftAction::Approved,
        ]
    );
    assert_eq!(trail[0].from, None);
    assert_eq!(trail[2].from, Some(ShiftStatus::PendingApproval));
    assert_eq!(trail[2].to, ShiftStatus::Rejected);
    assert_eq!(trail[2].reason.as_deref(), Some("recount"));
}

#[test]
fn test_stale_version_is_a_conflict() {
    let fx = fixture();
    let shift = ready_shift(&fx, date(2026, 1, 6), FuelType::Diesel, dec!(10), dec!(400));
    let stale = shift.version - 1;

    let err = fx
        .shifts
        .upsert_cash_slip(shift.id, cash_slip("A", dec!(1)), Some(stale))
        .unwrap_err();
    assert!(matches!(err, ShiftError::ConcurrencyConflict { .. }));

    let updated = fx
        .shifts
        .upsert_cash_slip(shift.id, cash_slip("A", dec!(1)), Some(shift.version))
        .unwrap();
    assert_eq!(updated.version, shift.version + 1);
}

#[test]
fn test_readings_are_validated() {
    let fx = fixture();
    let shift = ready_shift(&fx, date(2026, 1, 6), FuelType::Diesel, dec!(10), dec!(400));

    let err = fx
        .shifts
        .set_pump_readings(
            shift.id,
            vec![PumpIndexReading {
                nozzle: NozzleRef::new(1, 1),
                fuel: FuelType::Diesel,
                start_index: dec!(100),
                end_index: dec!(90),
            }],
            None,
        )
        .unwrap_err();
    assert!(matches!(err, ShiftError::InvalidPumpReading { .. }));

    let err = fx
        .shifts
        .set_tank_readings(
            shift.id,
            vec![TankReading {
                tank_no: 2,
                fuel: FuelType::Diesel,
                start_volume: dec!(-1),
                end_volume: dec!(0),
                delivered_volume: dec!(0),
                feeds: vec![],
            }],
            None,
        )
        .unwrap_err();
    assert!(matches!(err, ShiftError::InvalidTankReading { tank_no: 2 }));
}

#[test]
fn test_tank_variance_is_frozen_on_submit() {
    let fx = fixture();
    let shift = ready_shift(&fx, date(2026, 1, 7), FuelType::Diesel, dec!(2900), dec!(116000));
    fx.shifts
        .set_tank_readings(
            shift.id,
            vec![TankReading {
                tank_no: 1,
                fuel: FuelType::Diesel,
                start_volume: dec!(5000),
                end_volume: dec!(4000),
                delivered_volume: dec!(2000),
                feeds: vec![],
            }],
            None,
        )
        .unwrap();

    let live = fx.shifts.tank_variance(shift.id).unwrap();
    assert_eq!(live[0].expected_consumption, dec!(3000));
    assert_eq!(live[0].variance, dec!(100));

    let snapshot = fx.shifts.submit(shift.id, actor("cashier")).unwrap();
    assert_eq!(snapshot.tanks, fx.shifts.tank_variance(shift.id).unwrap());
}

#[test]
fn test_unknown_shift() {
    let fx = fixture();
    let id = fuelbook_shared::types::ShiftId::new();
    assert!(matches!(fx.shifts.get(id), Err(ShiftError::ShiftNotFound(_))));
    assert!(matches!(
        fx.shifts.archive(id),
        Err(ShiftError::ArchiveNotFound(_))
    ));
}
