//! Denormalized reports written on approval.
//!
//! Reports hold typed sections. They are serialized to JSON only when sealed,
//! and the SHA-256 of those bytes is stored next to them.

pub mod report;
pub mod seal;

pub use report::{ArchiveBuilder, ArchivedDepletion, ArchivedShiftReport};
pub use seal::SealedArchive;
