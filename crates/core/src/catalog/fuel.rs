//! Canonical fuel products.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fuel product sold at the pumps.
///
/// This is a closed set: every external product name must resolve to one of
/// these variants through [`super::FuelCatalog`] before it reaches the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    /// Standard diesel.
    Diesel,
    /// Additive / premium diesel.
    PremiumDiesel,
    /// 95 octane unleaded gasoline.
    Unleaded95,
    /// 97+ octane unleaded gasoline.
    Unleaded97,
    /// Autogas.
    Lpg,
}

impl FuelType {
    /// Every fuel product, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::Diesel,
        Self::PremiumDiesel,
        Self::Unleaded95,
        Self::Unleaded97,
        Self::Lpg,
    ];

    /// Returns the canonical code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Diesel => "diesel",
            Self::PremiumDiesel => "premium_diesel",
            Self::Unleaded95 => "unleaded_95",
            Self::Unleaded97 => "unleaded_97",
            Self::Lpg => "lpg",
        }
    }

    /// Parses a canonical code.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "diesel" => Some(Self::Diesel),
            "premium_diesel" => Some(Self::PremiumDiesel),
            "unleaded_95" => Some(Self::Unleaded95),
            "unleaded_97" => Some(Self::Unleaded97),
            "lpg" => Some(Self::Lpg),
            _ => None,
        }
    }

    /// Human readable product name for reports.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Diesel => "Diesel",
            Self::PremiumDiesel => "Premium Diesel",
            Self::Unleaded95 => "Unleaded 95",
            Self::Unleaded97 => "Unleaded 97",
            Self::Lpg => "LPG",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
