//! Shift domain types.

use chrono::{DateTime, NaiveDate, Utc};
use fuelbook_shared::types::{ArchiveId, ShiftId, StationId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::error::ShiftError;
use crate::reconciliation::{CashSlip, ReconciliationResult};
use crate::sales::{
    AttendantId, AutomationSale, FleetSale, MarketSale, PumpIndexReading, PumpIndexVariance,
    SalesAggregator, SalesBreakdown, SalesSummary,
};
use crate::tank::{TankInventorySnapshot, TankReading};

/// Shift status in the approval lifecycle.
///
/// Valid transitions:
/// - Open → PendingApproval (submit)
/// - Rejected → PendingApproval (submit)
/// - PendingApproval → Approved (approve)
/// - PendingApproval → Rejected (reject)
/// - Rejected → Open (reopen)
/// - PendingApproval / Approved → DeletionRequested (request deletion)
/// - DeletionRequested → Deleted (confirm deletion)
/// - DeletionRequested → prior status (decline deletion)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Imported and being completed by the cash office.
    Open,
    /// Submitted and waiting for an approver.
    PendingApproval,
    /// Approved, archived and depleted from stock.
    Approved,
    /// Sent back for corrections.
    Rejected,
    /// Waiting for a second person to confirm deletion.
    DeletionRequested,
    /// Soft-deleted.
    Deleted,
}

impl ShiftStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::DeletionRequested => "deletion_requested",
            Self::Deleted => "deleted",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "pending_approval" => Some(Self::PendingApproval),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "deletion_requested" => Some(Self::DeletionRequested),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }

    /// Returns true if child records (slips, readings) may be edited.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Open | Self::Rejected)
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftAction {
    /// Shift created from an import batch.
    Imported,
    /// Submitted for approval.
    Submitted,
    /// Approved.
    Approved,
    /// Rejected.
    Rejected,
    /// Reopened after rejection.
    Reopened,
    /// Deletion requested.
    DeletionRequested,
    /// Deletion confirmed by a second person.
    DeletionConfirmed,
    /// Deletion request declined.
    DeletionDeclined,
}

impl ShiftAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imported => "imported",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Reopened => "reopened",
            Self::DeletionRequested => "deletion_requested",
            Self::DeletionConfirmed => "deletion_confirmed",
            Self::DeletionDeclined => "deletion_declined",
        }
    }
}

impl fmt::Display for ShiftAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who performs an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id.
    pub id: UserId,
    /// Display name, when known.
    #[serde(default)]
    pub name: Option<String>,
}

impl Actor {
    /// Actor without a display name.
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self { id, name: None }
    }

    /// Actor with a display name.
    #[must_use]
    pub fn named(id: UserId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

/// A validated state change, ready to be applied and audited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftTransition {
    /// Action performed.
    pub action: ShiftAction,
    /// Status before.
    pub from: ShiftStatus,
    /// Status after.
    pub to: ShiftStatus,
    /// Who performed it.
    pub actor: Actor,
    /// Free-text reason, where one applies.
    pub reason: Option<String>,
    /// When it happened.
    pub at: DateTime<Utc>,
}

/// Aggregate shift totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShiftTotals {
    /// Automation + fleet sales.
    pub pump_total: Decimal,
    /// Shop sales.
    pub market_total: Decimal,
    /// Pump + market.
    pub grand_total: Decimal,
    /// Sum of slip totals.
    pub collections_total: Decimal,
    /// `collections_total - pump_total`.
    pub difference: Decimal,
}

/// Reconciliation figures computed at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationSnapshot {
    /// Totals.
    pub totals: ShiftTotals,
    /// Collection reconciliation.
    pub reconciliation: ReconciliationResult,
    /// Sales rows per fuel, nozzle and attendant.
    pub sales: SalesBreakdown,
    /// Tank variances.
    pub tanks: Vec<TankInventorySnapshot>,
    /// Pump meter variances.
    pub pumps: Vec<PumpIndexVariance>,
    /// When the snapshot was computed.
    pub computed_at: DateTime<Utc>,
}

/// A pending deletion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionRequest {
    /// Who asked.
    pub requested_by: UserId,
    /// Why.
    pub reason: String,
    /// When.
    pub requested_at: DateTime<Utc>,
    /// Status to return to if the request is declined.
    pub previous_status: ShiftStatus,
}

/// A normalized import batch from the automation export collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftImport {
    /// Station the shift belongs to.
    pub station_id: StationId,
    /// Shift open time.
    pub opened_at: DateTime<Utc>,
    /// Shift close time.
    pub closed_at: DateTime<Utc>,
    /// Pump / POS automation sales.
    #[serde(default)]
    pub automation_sales: Vec<AutomationSale>,
    /// Fleet card sales.
    #[serde(default)]
    pub fleet_sales: Vec<FleetSale>,
    /// Shop sales.
    #[serde(default)]
    pub market_sales: Vec<MarketSale>,
}

impl ShiftImport {
    /// Checks the batch is internally consistent.
    pub fn validate(&self) -> Result<(), ShiftError> {
        if self.closed_at < self.opened_at {
            return Err(ShiftError::InvalidImport(
                "shift closes before it opens".to_string(),
            ));
        }
        let negative_fuel_line = self
            .automation_sales
            .iter()
            .map(|s| (s.quantity, s.amount))
            .chain(self.fleet_sales.iter().map(|s| (s.quantity, s.amount)))
            .any(|(qty, amount)| qty < Decimal::ZERO || amount < Decimal::ZERO);
        if negative_fuel_line {
            return Err(ShiftError::InvalidImport(
                "sale quantity and amount must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// A fuel sales shift and its child records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Shift id.
    pub id: ShiftId,
    /// Station id.
    pub station_id: StationId,
    /// Open time.
    pub opened_at: DateTime<Utc>,
    /// Close time.
    pub closed_at: DateTime<Utc>,
    /// Current status.
    pub status: ShiftStatus,
    /// Automation sales, write-once.
    pub automation_sales: Vec<AutomationSale>,
    /// Fleet sales, write-once.
    pub fleet_sales: Vec<FleetSale>,
    /// Shop sales, write-once.
    pub market_sales: Vec<MarketSale>,
    /// One slip per attendant.
    pub cash_slips: BTreeMap<AttendantId, CashSlip>,
    /// Pump meter readings.
    pub pump_readings: Vec<PumpIndexReading>,
    /// Tank readings.
    pub tank_readings: Vec<TankReading>,
    /// Snapshot taken on submission.
    pub snapshot: Option<ReconciliationSnapshot>,
    /// Approver.
    pub approved_by: Option<UserId>,
    /// Approver display name.
    pub approver_name: Option<String>,
    /// Approval time.
    pub approved_at: Option<DateTime<Utc>>,
    /// Last rejection reason.
    pub rejection_reason: Option<String>,
    /// Pending deletion request.
    pub deletion: Option<DeletionRequest>,
    /// Set while child records must not change.
    pub locked: bool,
    /// Archived report, once approved.
    pub archive_id: Option<ArchiveId>,
    /// Incremented on every change.
    pub version: u64,
    /// Created.
    pub created_at: DateTime<Utc>,
    /// Last change.
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    /// Creates an open shift from a validated import batch.
    pub fn from_import(import: ShiftImport, at: DateTime<Utc>) -> Result<Self, ShiftError> {
        import.validate()?;
        Ok(Self {
            id: ShiftId::new(),
            station_id: import.station_id,
            opened_at: import.opened_at,
            closed_at: import.closed_at,
            status: ShiftStatus::Open,
            automation_sales: import.automation_sales,
            fleet_sales: import.fleet_sales,
            market_sales: import.market_sales,
            cash_slips: BTreeMap::new(),
            pump_readings: Vec::new(),
            tank_readings: Vec::new(),
            snapshot: None,
            approved_by: None,
            approver_name: None,
            approved_at: None,
            rejection_reason: None,
            deletion: None,
            locked: false,
            archive_id: None,
            version: 1,
            created_at: at,
            updated_at: at,
        })
    }

    /// Business date of the shift, used for stock month attribution.
    #[must_use]
    pub fn business_date(&self) -> NaiveDate {
        self.closed_at.date_naive()
    }

    /// Aggregated sales.
    #[must_use]
    pub fn sales_summary(&self) -> SalesSummary {
        SalesAggregator::aggregate(&self.automation_sales, &self.fleet_sales, &self.market_sales)
    }

    /// Attendants that appear on automation sales.
    pub fn automation_attendants(&self) -> impl Iterator<Item = &AttendantId> {
        self.automation_sales
            .iter()
            .filter_map(|sale| sale.attendant.as_ref())
    }

    /// Fails with `ShiftLocked` unless child records may be edited.
    pub fn ensure_editable(&self) -> Result<(), ShiftError> {
        if self.status.is_editable() && !self.locked {
            Ok(())
        } else {
            Err(ShiftError::ShiftLocked {
                id: self.id,
                status: self.status,
            })
        }
    }

    /// Applies a validated transition and bumps the version.
    pub fn apply(&mut self, transition: &ShiftTransition) {
        self.status = transition.to;
        match transition.action {
            ShiftAction::Imported => {}
            ShiftAction::Submitted => {
                self.locked = true;
                self.rejection_reason = None;
            }
            ShiftAction::Approved => {
                self.locked = true;
                self.approved_by = Some(transition.actor.id);
                self.approver_name.clone_from(&transition.actor.name);
                self.approved_at = Some(transition.at);
            }
            ShiftAction::Rejected => {
                self.locked = false;
                self.rejection_reason.clone_from(&transition.reason);
            }
            ShiftAction::Reopened => {
                self.locked = false;
            }
            ShiftAction::DeletionRequested => {
                self.deletion = Some(DeletionRequest {
                    requested_by: transition.actor.id,
                    reason: transition.reason.clone().unwrap_or_default(),
                    requested_at: transition.at,
                    previous_status: transition.from,
                });
            }
            ShiftAction::DeletionConfirmed => {
                self.locked = true;
            }
            ShiftAction::DeletionDeclined => {
                self.deletion = None;
            }
        }
        self.version += 1;
        self.updated_at = transition.at;
    }

    /// Records a child edit.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.version += 1;
        self.updated_at = at;
    }
}
