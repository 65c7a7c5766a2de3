//! Property tests for the shift state machine.

use chrono::Utc;
use fuelbook_shared::types::UserId;
use proptest::prelude::*;

use crate::shift::error::ShiftError;
use crate::shift::service::ShiftStateMachine;
use crate::shift::types::{Actor, DeletionRequest, ShiftStatus};

fn arb_status() -> impl Strategy<Value = ShiftStatus> {
    prop_oneof![
        Just(ShiftStatus::Open),
        Just(ShiftStatus::PendingApproval),
        Just(ShiftStatus::Approved),
        Just(ShiftStatus::Rejected),
        Just(ShiftStatus::DeletionRequested),
        Just(ShiftStatus::Deleted),
    ]
}

fn arb_actor() -> impl Strategy<Value = Actor> {
    any::<u128>().prop_map(|n| Actor::new(UserId::from_uuid(uuid::Uuid::from_u128(n))))
}

fn arb_reason() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9 ]{0,40}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every accepted transition is one the lifecycle allows, and every
    /// refused one reports the attempted move.
    #[test]
    fn prop_transitions_follow_lifecycle(
        status in arb_status(),
        actor in arb_actor(),
        reason in arb_reason(),
    ) {
        let attempts = [
            (ShiftStatus::PendingApproval, ShiftStateMachine::submit(status, actor.clone())),
            (ShiftStatus::Approved, ShiftStateMachine::approve(status, actor.clone())),
            (ShiftStatus::Rejected, ShiftStateMachine::reject(status, actor.clone(), &reason)),
            (ShiftStatus::Open, ShiftStateMachine::reopen(status, actor.clone())),
            (
                ShiftStatus::DeletionRequested,
                ShiftStateMachine::request_deletion(status, actor.clone(), &reason),
            ),
        ];

        for (target, result) in attempts {
            let allowed = ShiftStateMachine::is_valid_transition(status, target);
            match result {
                Ok(t) => {
                    prop_assert!(allowed);
                    prop_assert_eq!(t.from, status);
                    prop_assert_eq!(t.to, target);
                    prop_assert_eq!(&t.actor, &actor);
                }
                Err(ShiftError::InvalidStateTransition { from, to }) => {
                    prop_assert!(!allowed);
                    prop_assert_eq!(from, status);
                    prop_assert_eq!(to, target);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }

    /// Deletion can only be confirmed by someone other than the requester.
    #[test]
    fn prop_confirmer_differs_from_requester(
        requester in arb_actor(),
        confirmer in arb_actor(),
        previous in prop_oneof![Just(ShiftStatus::PendingApproval), Just(ShiftStatus::Approved)],
    ) {
        let request = DeletionRequest {
            requested_by: requester.id,
            reason: "duplicate".into(),
            requested_at: Utc::now(),
            previous_status: previous,
        };
        let same = requester.id == confirmer.id;
        let result = ShiftStateMachine::confirm_deletion(
            ShiftStatus::DeletionRequested,
            Some(&request),
            confirmer,
        );
        prop_assert_eq!(result.is_ok(), !same);

        let declined = ShiftStateMachine::decline_deletion(
            ShiftStatus::DeletionRequested,
            Some(&request),
            requester,
            "keep",
        );
        prop_assert_eq!(declined.map(|t| t.to).ok(), Some(previous));
    }

    /// Blank reasons are refused before the status is even looked at.
    #[test]
    fn prop_blank_reason_refused(status in arb_status(), actor in arb_actor(), blanks in " {0,5}") {
        let rejected = matches!(
            ShiftStateMachine::reject(status, actor.clone(), &blanks),
            Err(ShiftError::ReasonRequired)
        );
        let deletion = matches!(
            ShiftStateMachine::request_deletion(status, actor, &blanks),
            Err(ShiftError::ReasonRequired)
        );
        prop_assert!(rejected);
        prop_assert!(deletion);
    }
}
