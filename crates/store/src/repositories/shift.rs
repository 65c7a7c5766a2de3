//! Shift repository: lifecycle transitions, child edits and queries.

use chrono::Utc;
use fuelbook_core::archive::{ArchiveBuilder, SealedArchive};
use fuelbook_core::reconciliation::{CashSlip, ReconciliationVerdict};
use fuelbook_core::sales::{AttendantId, PumpIndexReading};
use fuelbook_core::shift::{
    Actor, ReconciliationSnapshot, Shift, ShiftAuditEvent, ShiftError, ShiftImport,
    ShiftReconciler, ShiftStateMachine, ShiftStatus, ShiftTransition,
};
use fuelbook_core::stock::{DepletionPlan, FifoPlanner, StockError, YearMonth};
use fuelbook_core::tank::{TankInventorySnapshot, TankReading, TankReconciler};
use fuelbook_shared::ReconciliationConfig;
use fuelbook_shared::types::{ShiftId, StationId};
use std::sync::Arc;
use tracing::{info, warn};

use crate::locks::acquire;
use crate::tables::Tables;
use crate::Store;

/// Shift lifecycle orchestration.
///
/// One operation per shift runs at a time. Approval additionally holds the
/// lock of every fuel it depletes, taken in fuel order.
#[derive(Clone)]
pub struct ShiftRepository {
    store: Arc<Store>,
    config: ReconciliationConfig,
}

impl ShiftRepository {
    /// Creates a repository over a store.
    #[must_use]
    pub const fn new(store: Arc<Store>, config: ReconciliationConfig) -> Self {
        Self { store, config }
    }

    /// Creates an open shift from a normalized import batch.
    pub fn import_shift(&self, import: ShiftImport, actor: &Actor) -> Result<Shift, ShiftError> {
        let now = Utc::now();
        let shift = Shift::from_import(import, now)?;
        let event = ShiftAuditEvent::imported(shift.id, actor, now);

        self.store.write(|t: &mut Tables| {
            t.shifts.insert(shift.id, shift.clone());
            t.append_audit(event);
            Ok::<_, ShiftError>(())
        })?;

        info!(
            shift_id = %shift.id,
            station_id = %shift.station_id,
            sales = shift.automation_sales.len() + shift.fleet_sales.len(),
            "Shift imported"
        );
        Ok(shift)
    }

    /// Reads a shift.
    pub fn get(&self, id: ShiftId) -> Result<Shift, ShiftError> {
        self.store
            .read(|t| t.shift(id).cloned())?
            .ok_or(ShiftError::ShiftNotFound(id))
    }

    /// Fails with `ShiftNotFound` before any lock is registered for `id`.
    fn ensure_exists(&self, id: ShiftId) -> Result<(), ShiftError> {
        if self.store.read(|t| t.shift(id).is_some())? {
            Ok(())
        } else {
            Err(ShiftError::ShiftNotFound(id))
        }
    }

    /// Shifts filtered by station and status, most recently closed first.
    pub fn list(
        &self,
        station_id: Option<StationId>,
        status: Option<ShiftStatus>,
    ) -> Result<Vec<Shift>, ShiftError> {
        let mut shifts: Vec<Shift> = self.store.read(|t| {
            t.shifts
                .values()
                .filter(|s| station_id.is_none_or(|id| s.station_id == id))
                .filter(|s| status.is_none_or(|st| s.status == st))
                .cloned()
                .collect()
        })?;
        shifts.sort_by(|a, b| b.closed_at.cmp(&a.closed_at).then(a.id.cmp(&b.id)));
        Ok(shifts)
    }

    // ========== Child records ==========

    /// Inserts or replaces the attendant's cash slip.
    pub fn upsert_cash_slip(
        &self,
        id: ShiftId,
        slip: CashSlip,
        expected_version: Option<u64>,
    ) -> Result<Shift, ShiftError> {
        if slip.has_negative_amount() {
            return Err(ShiftError::InvalidCashSlip(slip.attendant));
        }
        self.edit(id, expected_version, |shift| {
            shift.cash_slips.insert(slip.attendant.clone(), slip);
            Ok(())
        })
    }

    /// Removes the attendant's cash slip, if present.
    pub fn remove_cash_slip(
        &self,
        id: ShiftId,
        attendant: &AttendantId,
        expected_version: Option<u64>,
    ) -> Result<Shift, ShiftError> {
        self.edit(id, expected_version, |shift| {
            shift.cash_slips.remove(attendant);
            Ok(())
        })
    }

    /// Replaces the pump meter readings.
    pub fn set_pump_readings(
        &self,
        id: ShiftId,
        readings: Vec<PumpIndexReading>,
        expected_version: Option<u64>,
    ) -> Result<Shift, ShiftError> {
        if let Some(bad) = readings.iter().find(|r| r.meter_delta().is_none()) {
            return Err(ShiftError::InvalidPumpReading { nozzle: bad.nozzle });
        }
        self.edit(id, expected_version, |shift| {
            shift.pump_readings = readings;
            Ok(())
        })
    }

    /// Replaces the tank readings.
    pub fn set_tank_readings(
        &self,
        id: ShiftId,
        readings: Vec<TankReading>,
        expected_version: Option<u64>,
    ) -> Result<Shift, ShiftError> {
        if let Some(bad) = readings.iter().find(|r| r.has_negative_volume()) {
            return Err(ShiftError::InvalidTankReading {
                tank_no: bad.tank_no,
            });
        }
        self.edit(id, expected_version, |shift| {
            shift.tank_readings = readings;
            Ok(())
        })
    }

    fn edit(
        &self,
        id: ShiftId,
        expected_version: Option<u64>,
        change: impl FnOnce(&mut Shift) -> Result<(), ShiftError>,
    ) -> Result<Shift, ShiftError> {
        self.ensure_exists(id)?;
        let shift = self.store.shift_locks.with_lock(id, "shift", || {
            self.store.write(|t: &mut Tables| {
                let shift = t.shifts.get_mut(&id).ok_or(ShiftError::ShiftNotFound(id))?;
                check_version(shift, expected_version)?;
                shift.ensure_editable()?;
                change(shift)?;
                shift.touch(Utc::now());
                Ok::<_, ShiftError>(shift.clone())
            })
        })?;

        info!(shift_id = %id, version = shift.version, "Shift edited");
        Ok(shift)
    }

    // ========== Lifecycle ==========

    /// Reconciles the shift and moves it to `PendingApproval`.
    pub fn submit(&self, id: ShiftId, actor: Actor) -> Result<ReconciliationSnapshot, ShiftError> {
        self.ensure_exists(id)?;
        self.store
            .shift_locks
            .with_lock(id, "shift", || self.submit_locked(id, actor))
    }

    fn submit_locked(&self, id: ShiftId, actor: Actor) -> Result<ReconciliationSnapshot, ShiftError> {
        let shift = self.get(id)?;
        let transition = ShiftStateMachine::submit(shift.status, actor)?;
        let snapshot = ShiftReconciler::reconcile(&shift, &self.config, transition.at)
            .inspect_err(|e| warn!(shift_id = %id, error = %e, "Submission refused"))?;

        self.commit(&shift, &transition, |current| {
            current.snapshot = Some(snapshot.clone());
        })?;

        let verdict = snapshot.reconciliation.verdict;
        if verdict == ReconciliationVerdict::CriticalDiscrepancy {
            warn!(
                shift_id = %id,
                difference = %snapshot.totals.difference,
                percent = %snapshot.reconciliation.difference_percent,
                "Critical collection discrepancy"
            );
        }
        info!(shift_id = %id, verdict = %verdict, "Shift submitted");
        Ok(snapshot)
    }

    /// Approves a pending shift.
    ///
    /// Archives the report, depletes stock for every fuel sold and moves the
    /// shift to `Approved` in one commit. Repeating the call on an approved
    /// shift returns the stored archive.
    pub fn approve(&self, id: ShiftId, actor: Actor) -> Result<SealedArchive, ShiftError> {
        self.ensure_exists(id)?;
        self.store
            .shift_locks
            .with_lock(id, "shift", || self.approve_locked(id, actor))
    }

    fn approve_locked(&self, id: ShiftId, actor: Actor) -> Result<SealedArchive, ShiftError> {
        let shift = self.get(id)?;
        if shift.status == ShiftStatus::Approved {
            info!(shift_id = %id, "Shift already approved");
            return self.archive(id);
        }
        let transition = ShiftStateMachine::approve(shift.status, actor)?;
        let snapshot = match &shift.snapshot {
            Some(snapshot) => snapshot.clone(),
            None => ShiftReconciler::reconcile(&shift, &self.config, transition.at)?,
        };

        let requests = ShiftReconciler::depletion_requests(&shift);
        let fuel_handles = self.store.fuel_locks.handles(requests.keys().copied());
        let _fuel_guards = fuel_handles
            .iter()
            .map(|(fuel, handle)| acquire(handle, "fuel", fuel))
            .collect::<Result<Vec<_>, _>>()?;

        let sale_date = shift.business_date();
        let period = YearMonth::of(sale_date);
        let plans = self
            .store
            .read(|t| {
                requests
                    .iter()
                    .map(|(fuel, quantity)| {
                        if t.is_month_locked(*fuel, period) {
                            return Err(StockError::MonthLocked {
                                fuel: *fuel,
                                year: period.year,
                                month: period.month,
                            });
                        }
                        FifoPlanner::plan(*fuel, t.fuel_batches(*fuel), *quantity)
                    })
                    .collect::<Result<Vec<DepletionPlan>, StockError>>()
            })?
            .inspect_err(|e| warn!(shift_id = %id, error = %e, "Approval refused by stock ledger"))?;

        let report = ArchiveBuilder::build(&shift, &snapshot, &plans, &transition.actor, transition.at);
        let sealed = SealedArchive::seal(report)?;

        self.store.write(|t: &mut Tables| {
            let current = t.shift(id).ok_or(ShiftError::ShiftNotFound(id))?;
            check_version(current, Some(shift.version))?;

            let mut staged = t.batches.clone();
            for plan in &plans {
                FifoPlanner::apply(staged.values_mut(), plan)?;
            }

            t.batches = staged;
            for plan in &plans {
                t.depletions
                    .extend(plan.to_depletions(id, sale_date, transition.at));
            }
            if let Some(current) = t.shifts.get_mut(&id) {
                current.snapshot = Some(snapshot);
                current.archive_id = Some(sealed.report.id);
                current.apply(&transition);
            }
            t.archives.insert(id, sealed.clone());
            t.append_audit(ShiftAuditEvent::from_transition(id, &transition));
            Ok::<_, ShiftError>(())
        })?;

        for plan in &plans {
            info!(
                shift_id = %id,
                fuel = %plan.fuel,
                quantity = %plan.requested,
                batches = plan.slices.len(),
                "Stock depleted"
            );
        }
        info!(shift_id = %id, archive_id = %sealed.report.id, "Shift approved");
        Ok(sealed)
    }

    /// Sends a pending shift back for corrections.
    pub fn reject(&self, id: ShiftId, actor: Actor, reason: &str) -> Result<Shift, ShiftError> {
        self.transition(id, |shift| ShiftStateMachine::reject(shift.status, actor, reason))
    }

    /// Reopens a rejected shift.
    pub fn reopen(&self, id: ShiftId, actor: Actor) -> Result<Shift, ShiftError> {
        self.transition(id, |shift| ShiftStateMachine::reopen(shift.status, actor))
    }

    /// Requests deletion of a pending or approved shift.
    pub fn request_deletion(
        &self,
        id: ShiftId,
        actor: Actor,
        reason: &str,
    ) -> Result<Shift, ShiftError> {
        self.transition(id, |shift| {
            ShiftStateMachine::request_deletion(shift.status, actor, reason)
        })
    }

    /// Confirms a deletion request. Stock depletions are kept.
    pub fn confirm_deletion(&self, id: ShiftId, actor: Actor) -> Result<Shift, ShiftError> {
        self.transition(id, |shift| {
            ShiftStateMachine::confirm_deletion(shift.status, shift.deletion.as_ref(), actor)
        })
    }

    /// Declines a deletion request.
    pub fn decline_deletion(
        &self,
        id: ShiftId,
        actor: Actor,
        reason: &str,
    ) -> Result<Shift, ShiftError> {
        self.transition(id, |shift| {
            ShiftStateMachine::decline_deletion(
                shift.status,
                shift.deletion.as_ref(),
                actor,
                reason,
            )
        })
    }

    fn transition(
        &self,
        id: ShiftId,
        decide: impl FnOnce(&Shift) -> Result<ShiftTransition, ShiftError>,
    ) -> Result<Shift, ShiftError> {
        self.ensure_exists(id)?;
        let (transition, updated) = self.store.shift_locks.with_lock(id, "shift", || {
            let shift = self.get(id)?;
            let transition = decide(&shift)?;
            let updated = self.commit(&shift, &transition, |_| {})?;
            Ok::<_, ShiftError>((transition, updated))
        })?;

        info!(
            shift_id = %id,
            action = %transition.action,
            from = %transition.from,
            to = %transition.to,
            "Shift transitioned"
        );
        Ok(updated)
    }

    /// Applies a transition if the shift is still at the version read.
    fn commit(
        &self,
        read: &Shift,
        transition: &ShiftTransition,
        extra: impl FnOnce(&mut Shift),
    ) -> Result<Shift, ShiftError> {
        self.store.write(|t: &mut Tables| {
            let current = t
                .shifts
                .get_mut(&read.id)
                .ok_or(ShiftError::ShiftNotFound(read.id))?;
            check_version(current, Some(read.version))?;
            extra(current);
            current.apply(transition);
            let updated = current.clone();
            t.append_audit(ShiftAuditEvent::from_transition(read.id, transition));
            Ok(updated)
        })
    }

    // ========== Queries ==========

    /// Audit trail of a shift, oldest first.
    pub fn audit_trail(&self, id: ShiftId) -> Result<Vec<ShiftAuditEvent>, ShiftError> {
        self.store
            .read(|t| {
                t.shift(id)
                    .map(|_| t.audit.get(&id).cloned().unwrap_or_default())
            })?
            .ok_or(ShiftError::ShiftNotFound(id))
    }

    /// Sealed archive of an approved shift.
    pub fn archive(&self, id: ShiftId) -> Result<SealedArchive, ShiftError> {
        self.store
            .read(|t| t.archives.get(&id).cloned())?
            .ok_or(ShiftError::ArchiveNotFound(id))
    }

    /// Tank variances: the submitted snapshot, or a live computation while open.
    pub fn tank_variance(&self, id: ShiftId) -> Result<Vec<TankInventorySnapshot>, ShiftError> {
        let shift = self.get(id)?;
        match &shift.snapshot {
            Some(snapshot) if !shift.status.is_editable() => Ok(snapshot.tanks.clone()),
            _ => Ok(TankReconciler::reconcile(
                &shift.tank_readings,
                &shift.sales_summary(),
            )),
        }
    }
}

fn check_version(shift: &Shift, expected: Option<u64>) -> Result<(), ShiftError> {
    match expected {
        Some(expected) if expected != shift.version => Err(ShiftError::ConcurrencyConflict {
            expected,
            actual: shift.version,
        }),
        _ => Ok(()),
    }
}
