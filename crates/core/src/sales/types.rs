//! Sale record types.
//!
//! Sale records arrive from the import collaborator already normalized and
//! are write-once after import.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::FuelType;

/// Identity of a pump attendant as reported by the automation system.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendantId(pub String);

impl AttendantId {
    /// Creates an attendant id, trimming surrounding whitespace.
    #[must_use]
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_string())
    }
}

impl fmt::Display for AttendantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pump and one of its nozzles ("gun").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NozzleRef {
    /// Pump number at the station.
    pub pump: u16,
    /// Nozzle number on the pump.
    pub nozzle: u16,
}

impl NozzleRef {
    /// Creates a nozzle reference.
    #[must_use]
    pub const fn new(pump: u16, nozzle: u16) -> Self {
        Self { pump, nozzle }
    }
}

impl fmt::Display for NozzleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}/N{}", self.pump, self.nozzle)
    }
}

/// Tender type used for per-method breakdown rows.
///
/// Automation rarely reports tender type, so most automation sales land in
/// `Unclassified` on the system side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash in the drawer.
    Cash,
    /// Credit or debit card.
    Card,
    /// Loyalty points or loyalty card redemption.
    Loyalty,
    /// Mobile wallet payment.
    Mobile,
    /// Paper or digital voucher.
    Voucher,
    /// Bank transfer.
    BankTransfer,
    /// On-account sale to a known customer.
    CreditSale,
    /// Fleet card sale billed to the fleet owner.
    Fleet,
    /// System sale without tender information.
    Unclassified,
}

impl PaymentMethod {
    /// Returns the string representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Card => "card",
            Self::Loyalty => "loyalty",
            Self::Mobile => "mobile",
            Self::Voucher => "voucher",
            Self::BankTransfer => "bank_transfer",
            Self::CreditSale => "credit_sale",
            Self::Fleet => "fleet",
            Self::Unclassified => "unclassified",
        }
    }
}

/// A sale reported by the pump / POS automation system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationSale {
    /// Fuel sold.
    pub fuel: FuelType,
    /// Pump and nozzle that dispensed the fuel.
    pub nozzle: NozzleRef,
    /// Litres dispensed.
    pub quantity: Decimal,
    /// Price per litre.
    pub unit_price: Decimal,
    /// Amount charged.
    pub amount: Decimal,
    /// When the sale was completed.
    pub sold_at: DateTime<Utc>,
    /// Attendant tag, when the automation reports one.
    #[serde(default)]
    pub attendant: Option<AttendantId>,
    /// Tender type, when the automation reports one.
    #[serde(default)]
    pub payment_hint: Option<PaymentMethod>,
    /// Loyalty card number presented at the pump.
    #[serde(default)]
    pub loyalty_card: Option<String>,
}

impl AutomationSale {
    /// Infers the system-side payment bucket from sale metadata.
    #[must_use]
    pub fn payment_bucket(&self) -> PaymentMethod {
        match (self.payment_hint, &self.loyalty_card) {
            (Some(method), _) => method,
            (None, Some(_)) => PaymentMethod::Loyalty,
            (None, None) => PaymentMethod::Unclassified,
        }
    }
}

/// A fleet / card-on-account sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSale {
    /// Fuel sold.
    pub fuel: FuelType,
    /// Pump and nozzle that dispensed the fuel.
    pub nozzle: NozzleRef,
    /// Litres dispensed.
    pub quantity: Decimal,
    /// Price per litre.
    pub unit_price: Decimal,
    /// Amount billed.
    pub amount: Decimal,
    /// When the sale was completed.
    pub sold_at: DateTime<Utc>,
    /// Vehicle plate.
    #[serde(default)]
    pub plate: Option<String>,
    /// Fleet card identifier.
    #[serde(default)]
    pub fleet_card: Option<String>,
    /// Attendant tag, when reported.
    #[serde(default)]
    pub attendant: Option<AttendantId>,
}

/// A shop (market) sale recorded alongside the fuel shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSale {
    /// Item or category description.
    pub description: String,
    /// Amount charged.
    pub amount: Decimal,
    /// When the sale was completed.
    pub sold_at: DateTime<Utc>,
}

/// Start and end meter values for one nozzle over a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PumpIndexReading {
    /// Pump and nozzle being read.
    pub nozzle: NozzleRef,
    /// Fuel dispensed by the nozzle.
    pub fuel: FuelType,
    /// Meter value at shift open.
    pub start_index: Decimal,
    /// Meter value at shift close.
    pub end_index: Decimal,
}

impl PumpIndexReading {
    /// Litres dispensed according to the meter, `None` if the meter went backwards.
    #[must_use]
    pub fn meter_delta(&self) -> Option<Decimal> {
        (self.end_index >= self.start_index).then(|| self.end_index - self.start_index)
    }
}
