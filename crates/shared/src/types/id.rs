//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `ShiftId` where a `StationId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(StationId, "Unique identifier for a fuel station.");
typed_id!(ShiftId, "Unique identifier for a sales shift.");
typed_id!(
    UserId,
    "Unique identifier for a back-office user acting on a shift or the ledger."
);
typed_id!(CashSlipId, "Unique identifier for an attendant's cash slip.");
typed_id!(
    InvoiceBatchId,
    "Unique identifier for a fuel invoice batch in the FIFO ledger."
);
typed_id!(DepletionId, "Unique identifier for a single FIFO depletion slice.");
typed_id!(AuditEventId, "Unique identifier for a shift audit event.");
typed_id!(ArchiveId, "Unique identifier for an archived shift report.");
