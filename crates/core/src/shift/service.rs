//! Shift state machine.
//!
//! Each function validates one transition and returns the `ShiftTransition`
//! to apply and audit. Nothing here touches storage.

use chrono::Utc;

use super::error::ShiftError;
use super::types::{Actor, DeletionRequest, ShiftAction, ShiftStatus, ShiftTransition};

/// Stateless service validating shift lifecycle transitions.
pub struct ShiftStateMachine;

impl ShiftStateMachine {
    /// Submit an open or rejected shift for approval.
    pub fn submit(current: ShiftStatus, actor: Actor) -> Result<ShiftTransition, ShiftError> {
        Self::transition(
            current,
            ShiftStatus::PendingApproval,
            ShiftAction::Submitted,
            actor,
            None,
        )
    }

    /// Approve a pending shift.
    pub fn approve(current: ShiftStatus, actor: Actor) -> Result<ShiftTransition, ShiftError> {
        Self::transition(current, ShiftStatus::Approved, ShiftAction::Approved, actor, None)
    }

    /// Reject a pending shift. The reason is required.
    pub fn reject(
        current: ShiftStatus,
        actor: Actor,
        reason: &str,
    ) -> Result<ShiftTransition, ShiftError> {
        let reason = Self::required_reason(reason)?;
        Self::transition(
            current,
            ShiftStatus::Rejected,
            ShiftAction::Rejected,
            actor,
            Some(reason),
        )
    }

    /// Reopen a rejected shift for editing.
    pub fn reopen(current: ShiftStatus, actor: Actor) -> Result<ShiftTransition, ShiftError> {
        Self::transition(current, ShiftStatus::Open, ShiftAction::Reopened, actor, None)
    }

    /// Ask for a pending or approved shift to be deleted. The reason is required.
    pub fn request_deletion(
        current: ShiftStatus,
        actor: Actor,
        reason: &str,
    ) -> Result<ShiftTransition, ShiftError> {
        let reason = Self::required_reason(reason)?;
        Self::transition(
            current,
            ShiftStatus::DeletionRequested,
            ShiftAction::DeletionRequested,
            actor,
            Some(reason),
        )
    }

    /// Confirm a deletion request. The confirmer must not be the requester.
    pub fn confirm_deletion(
        current: ShiftStatus,
        request: Option<&DeletionRequest>,
        actor: Actor,
    ) -> Result<ShiftTransition, ShiftError> {
        let request = Self::pending_request(current, request, ShiftStatus::Deleted)?;
        if request.requested_by == actor.id {
            return Err(ShiftError::SameApprover);
        }
        Self::transition(
            current,
            ShiftStatus::Deleted,
            ShiftAction::DeletionConfirmed,
            actor,
            None,
        )
    }

    /// Decline a deletion request, returning the shift to its prior status.
    pub fn decline_deletion(
        current: ShiftStatus,
        request: Option<&DeletionRequest>,
        actor: Actor,
        reason: &str,
    ) -> Result<ShiftTransition, ShiftError> {
        let reason = Self::required_reason(reason)?;
        let request = Self::pending_request(current, request, ShiftStatus::Open)?;
        Ok(ShiftTransition {
            action: ShiftAction::DeletionDeclined,
            from: current,
            to: request.previous_status,
            actor,
            reason: Some(reason),
            at: Utc::now(),
        })
    }

    /// Returns true if `from -> to` is a legal lifecycle move.
    ///
    /// `DeletionRequested` may return to `PendingApproval` or `Approved` when
    /// a request is declined.
    #[must_use]
    pub fn is_valid_transition(from: ShiftStatus, to: ShiftStatus) -> bool {
        use ShiftStatus::{Approved, Deleted, DeletionRequested, Open, PendingApproval, Rejected};
        matches!(
            (from, to),
            (Open | Rejected, PendingApproval)
                | (PendingApproval, Approved | Rejected | DeletionRequested)
                | (Rejected, Open)
                | (Approved, DeletionRequested)
                | (DeletionRequested, Deleted | PendingApproval | Approved)
        )
    }

    fn transition(
        current: ShiftStatus,
        to: ShiftStatus,
        action: ShiftAction,
        actor: Actor,
        reason: Option<String>,
    ) -> Result<ShiftTransition, ShiftError> {
        if !Self::is_valid_transition(current, to) {
            return Err(ShiftError::InvalidStateTransition { from: current, to });
        }
        Ok(ShiftTransition {
            action,
            from: current,
            to,
            actor,
            reason,
            at: Utc::now(),
        })
    }

    fn pending_request(
        current: ShiftStatus,
        request: Option<&DeletionRequest>,
        to: ShiftStatus,
    ) -> Result<&DeletionRequest, ShiftError> {
        match (current, request) {
            (ShiftStatus::DeletionRequested, Some(request)) => Ok(request),
            _ => Err(ShiftError::InvalidStateTransition { from: current, to }),
        }
    }

    fn required_reason(reason: &str) -> Result<String, ShiftError> {
        let reason = reason.trim();
        if reason.is_empty() {
            Err(ShiftError::ReasonRequired)
        } else {
            Ok(reason.to_string())
        }
    }
}
