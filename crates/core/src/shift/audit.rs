//! Append-only shift audit events.

use chrono::{DateTime, Utc};
use fuelbook_shared::types::{AuditEventId, ShiftId, UserId};
use serde::{Deserialize, Serialize};

use super::types::{Actor, ShiftAction, ShiftStatus, ShiftTransition};

/// One lifecycle event. Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAuditEvent {
    /// Event id.
    pub id: AuditEventId,
    /// Shift the event belongs to.
    pub shift_id: ShiftId,
    /// Action performed.
    pub action: ShiftAction,
    /// Status before, `None` for the import event.
    pub from: Option<ShiftStatus>,
    /// Status after.
    pub to: ShiftStatus,
    /// Who performed the action.
    pub actor: UserId,
    /// Actor display name.
    pub actor_name: Option<String>,
    /// Free-text reason.
    pub reason: Option<String>,
    /// When it happened.
    pub at: DateTime<Utc>,
}

impl ShiftAuditEvent {
    /// Event for a newly imported shift.
    #[must_use]
    pub fn imported(shift_id: ShiftId, actor: &Actor, at: DateTime<Utc>) -> Self {
        Self {
            id: AuditEventId::new(),
            shift_id,
            action: ShiftAction::Imported,
            from: None,
            to: ShiftStatus::Open,
            actor: actor.id,
            actor_name: actor.name.clone(),
            reason: None,
            at,
        }
    }

    /// Event for an applied transition.
    #[must_use]
    pub fn from_transition(shift_id: ShiftId, transition: &ShiftTransition) -> Self {
        Self {
            id: AuditEventId::new(),
            shift_id,
            action: transition.action,
            from: Some(transition.from),
            to: transition.to,
            actor: transition.actor.id,
            actor_name: transition.actor.name.clone(),
            reason: transition.reason.clone(),
            at: transition.at,
        }
    }
}
