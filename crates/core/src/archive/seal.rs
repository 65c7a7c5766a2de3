//! Tamper-evident archive sealing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::report::ArchivedShiftReport;
use crate::shift::ShiftError;

/// A report with its JSON form and digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedArchive {
    /// The typed report.
    pub report: ArchivedShiftReport,
    /// JSON bytes the digest was computed over.
    pub json: String,
    /// Lowercase hex SHA-256 of `json`.
    pub digest: String,
}

impl SealedArchive {
    /// Serializes and digests a report.
    pub fn seal(report: ArchivedShiftReport) -> Result<Self, ShiftError> {
        let json =
            serde_json::to_string(&report).map_err(|e| ShiftError::Archive(e.to_string()))?;
        let digest = Self::digest_of(&json);
        Ok(Self {
            report,
            json,
            digest,
        })
    }

    /// SHA-256 of the given JSON, lowercase hex.
    #[must_use]
    pub fn digest_of(json: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Whether the JSON still matches its digest and decodes to the report.
    #[must_use]
    pub fn verify(&self) -> bool {
        if Self::digest_of(&self.json) != self.digest {
            return false;
        }
        serde_json::from_str::<ArchivedShiftReport>(&self.json)
            .is_ok_and(|decoded| decoded == self.report)
    }
}
