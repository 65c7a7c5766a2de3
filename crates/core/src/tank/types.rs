//! Tank reading and snapshot types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::FuelType;
use crate::sales::NozzleRef;

/// Volume readings for one tank over a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankReading {
    /// Tank number at the station.
    pub tank_no: u16,
    /// Fuel stored in the tank.
    pub fuel: FuelType,
    /// Litres at shift open.
    pub start_volume: Decimal,
    /// Litres at shift close.
    pub end_volume: Decimal,
    /// Litres delivered during the shift.
    #[serde(default)]
    pub delivered_volume: Decimal,
    /// Nozzles fed by this tank. Empty means every nozzle of the fuel.
    #[serde(default)]
    pub feeds: Vec<NozzleRef>,
}

impl TankReading {
    /// Whether any of the volumes is negative.
    #[must_use]
    pub fn has_negative_volume(&self) -> bool {
        [self.start_volume, self.end_volume, self.delivered_volume]
            .iter()
            .any(|volume| *volume < Decimal::ZERO)
    }

    /// `start + delivered - end`.
    #[must_use]
    pub fn expected_consumption(&self) -> Decimal {
        self.start_volume + self.delivered_volume - self.end_volume
    }
}

/// Reconciled inventory figures for one tank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankInventorySnapshot {
    /// Tank number.
    pub tank_no: u16,
    /// Fuel stored.
    pub fuel: FuelType,
    /// Litres at shift open.
    pub start_volume: Decimal,
    /// Litres at shift close.
    pub end_volume: Decimal,
    /// Litres delivered.
    pub delivered_volume: Decimal,
    /// Litres sold from the tank according to sales records.
    pub sold_quantity: Decimal,
    /// `start + delivered - end`.
    pub expected_consumption: Decimal,
    /// `expected - sold`. Positive means unaccounted loss.
    pub variance: Decimal,
}
