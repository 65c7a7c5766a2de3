//! Decimal helpers for money and fuel volumes.
//!
//! CRITICAL: Never use floating-point for money or litres.
//! Everything here works on `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Scale used for currency amounts (kuruş / cents).
pub const MONEY_SCALE: u32 = 2;

/// Scale used for fuel volumes in litres.
pub const LITRE_SCALE: u32 = 3;

/// Rounds a currency amount to [`MONEY_SCALE`] using Banker's Rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Rounds a volume to [`LITRE_SCALE`] using Banker's Rounding.
#[must_use]
pub fn round_litres(volume: Decimal) -> Decimal {
    volume.round_dp_with_strategy(LITRE_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns `part / whole * 100`, or zero when `whole` is not positive.
///
/// The result is not rounded; callers decide on presentation scale.
#[must_use]
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    }
}
