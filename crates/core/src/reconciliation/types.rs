//! Cash slip and reconciliation result types.

use fuelbook_shared::ReconciliationConfig;
use fuelbook_shared::types::CashSlipId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::sales::{AttendantId, PaymentMethod};

/// A card payment line on a cash slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCardDetail {
    /// Acquiring bank or terminal label.
    pub bank: String,
    /// Amount settled through the terminal.
    pub amount: Decimal,
}

/// Kind of non-cash, non-card collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherPaymentKind {
    /// Paper or digital voucher.
    Voucher,
    /// Mobile wallet.
    MobilePayment,
    /// Loyalty points redemption.
    LoyaltyPoints,
    /// Bank transfer.
    BankTransfer,
}

impl OtherPaymentKind {
    /// Payment method bucket the kind is reported under.
    #[must_use]
    pub const fn method(self) -> PaymentMethod {
        match self {
            Self::Voucher => PaymentMethod::Voucher,
            Self::MobilePayment => PaymentMethod::Mobile,
            Self::LoyaltyPoints => PaymentMethod::Loyalty,
            Self::BankTransfer => PaymentMethod::BankTransfer,
        }
    }
}

/// A non-cash, non-card collection line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherPayment {
    /// Collection kind.
    pub kind: OtherPaymentKind,
    /// Amount collected.
    pub amount: Decimal,
    /// Free-text note (voucher number, transfer reference).
    #[serde(default)]
    pub note: Option<String>,
}

/// An on-account sale to a known customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSale {
    /// Customer name or account code.
    pub customer: String,
    /// Vehicle plate.
    #[serde(default)]
    pub plate: Option<String>,
    /// Amount put on account.
    pub amount: Decimal,
}

/// An attendant's manual tally of collections for a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashSlip {
    /// Slip id.
    pub id: CashSlipId,
    /// Attendant the slip belongs to.
    pub attendant: AttendantId,
    /// Attendant display name.
    #[serde(default)]
    pub attendant_name: Option<String>,
    /// Cash handed in.
    pub cash: Decimal,
    /// Card terminal lines.
    #[serde(default)]
    pub card_details: Vec<CreditCardDetail>,
    /// Other collection lines.
    #[serde(default)]
    pub other_payments: Vec<OtherPayment>,
    /// On-account sales.
    #[serde(default)]
    pub credit_sales: Vec<CreditSale>,
}

impl CashSlip {
    /// Sum of card lines.
    #[must_use]
    pub fn card_total(&self) -> Decimal {
        self.card_details.iter().map(|line| line.amount).sum()
    }

    /// Sum of other payment lines.
    #[must_use]
    pub fn other_total(&self) -> Decimal {
        self.other_payments.iter().map(|line| line.amount).sum()
    }

    /// Sum of on-account sales.
    #[must_use]
    pub fn credit_total(&self) -> Decimal {
        self.credit_sales.iter().map(|line| line.amount).sum()
    }

    /// Slip total. Always derived from the lines, never stored.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cash + self.card_total() + self.other_total() + self.credit_total()
    }

    /// Whether any amount on the slip is negative.
    #[must_use]
    pub fn has_negative_amount(&self) -> bool {
        self.cash < Decimal::ZERO
            || self.card_details.iter().any(|l| l.amount < Decimal::ZERO)
            || self.other_payments.iter().any(|l| l.amount < Decimal::ZERO)
            || self.credit_sales.iter().any(|l| l.amount < Decimal::ZERO)
    }
}

/// Tiered classification of the collections gap.
///
/// Variants are ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationVerdict {
    /// Gap below the balanced tolerance.
    Balanced,
    /// Gap above tolerance but below the percentage threshold.
    MinorDiscrepancy,
    /// Everything else.
    CriticalDiscrepancy,
}

impl ReconciliationVerdict {
    /// Returns the string representation of the verdict.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::MinorDiscrepancy => "minor_discrepancy",
            Self::CriticalDiscrepancy => "critical_discrepancy",
        }
    }
}

impl fmt::Display for ReconciliationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Thresholds used to tier a difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationThresholds {
    /// `|diff|` strictly below this is balanced.
    pub balanced_tolerance: Decimal,
    /// `|diff%|` strictly below this is a minor discrepancy.
    pub minor_percent: Decimal,
}

impl Default for ReconciliationThresholds {
    fn default() -> Self {
        Self {
            balanced_tolerance: Decimal::ONE,
            minor_percent: Decimal::ONE,
        }
    }
}

impl From<&ReconciliationConfig> for ReconciliationThresholds {
    fn from(config: &ReconciliationConfig) -> Self {
        Self {
            balanced_tolerance: config.balanced_tolerance,
            minor_percent: config.minor_percent_threshold,
        }
    }
}

/// One payment method line of the reconciliation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodRow {
    /// Payment method.
    pub method: PaymentMethod,
    /// System-side amount, when the system reports this method at all.
    pub system_amount: Option<Decimal>,
    /// Amount collected on slips.
    pub collected_amount: Decimal,
    /// `collected - system`, when a system amount exists.
    pub difference: Option<Decimal>,
}

/// Result of reconciling a shift's collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    /// Automation + fleet sales.
    pub system_total: Decimal,
    /// Sum of every slip total.
    pub collections_total: Decimal,
    /// `collections_total - system_total`, exact.
    pub difference: Decimal,
    /// Difference as a percentage of system sales, rounded to two places.
    pub difference_percent: Decimal,
    /// Tiered verdict.
    pub verdict: ReconciliationVerdict,
    /// Per-method detail rows.
    pub method_rows: Vec<PaymentMethodRow>,
    /// Number of slips reconciled.
    pub slip_count: usize,
}
