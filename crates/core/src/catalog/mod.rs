//! Fuel catalog: maps the product names used by pump automation vendors and
//! invoices onto canonical [`FuelType`] values.

pub mod fuel;

pub use fuel::FuelType;

use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;

/// An external product name that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown fuel product: {0}")]
pub struct UnknownFuel(pub String);

/// Vendor product names, already normalized (see [`normalize`]).
static ALIASES: Lazy<HashMap<&'static str, FuelType>> = Lazy::new(|| {
    [
        ("MOTORIN", FuelType::Diesel),
        ("DIESEL", FuelType::Diesel),
        ("DIZEL", FuelType::Diesel),
        ("EURODIESEL", FuelType::Diesel),
        ("EURO DIESEL", FuelType::Diesel),
        ("MOTORIN PREMIUM", FuelType::PremiumDiesel),
        ("PREMIUM DIESEL", FuelType::PremiumDiesel),
        ("V MAX DIESEL", FuelType::PremiumDiesel),
        ("VMAX DIESEL", FuelType::PremiumDiesel),
        ("ULTRA FORCE DIESEL", FuelType::PremiumDiesel),
        ("EXCELLIUM DIESEL", FuelType::PremiumDiesel),
        ("BENZIN", FuelType::Unleaded95),
        ("KURSUNSUZ 95", FuelType::Unleaded95),
        ("KURSUNSUZ BENZIN 95", FuelType::Unleaded95),
        ("K BENZIN 95", FuelType::Unleaded95),
        ("UNLEADED 95", FuelType::Unleaded95),
        ("GASOLINE 95", FuelType::Unleaded95),
        ("KURSUNSUZ 97", FuelType::Unleaded97),
        ("KURSUNSUZ BENZIN 97", FuelType::Unleaded97),
        ("V MAX KURSUNSUZ 97", FuelType::Unleaded97),
        ("PREMIUM BENZIN", FuelType::Unleaded97),
        ("UNLEADED 97", FuelType::Unleaded97),
        ("LPG", FuelType::Lpg),
        ("OTOGAZ", FuelType::Lpg),
        ("AUTOGAS", FuelType::Lpg),
    ]
    .into_iter()
    .collect()
});

/// Static lookup from external product names to canonical fuels.
pub struct FuelCatalog;

impl FuelCatalog {
    /// Resolves a canonical code or a known vendor product name.
    pub fn resolve(name: &str) -> Result<FuelType, UnknownFuel> {
        if let Some(fuel) = FuelType::parse(name) {
            return Ok(fuel);
        }
        ALIASES
            .get(normalize(name).as_str())
            .copied()
            .ok_or_else(|| UnknownFuel(name.trim().to_string()))
    }

    /// Returns every alias registered for a fuel, sorted.
    #[must_use]
    pub fn aliases(fuel: FuelType) -> Vec<&'static str> {
        let mut names: Vec<_> = ALIASES
            .iter()
            .filter(|(_, f)| **f == fuel)
            .map(|(name, _)| *name)
            .collect();
        names.sort_unstable();
        names
    }
}

/// Uppercases, folds Turkish letters to ASCII, and collapses punctuation
/// and whitespace runs into single spaces.
fn normalize(name: &str) -> String {
    let folded: String = name
        .chars()
        .map(|c| match c {
            'İ' | 'ı' | 'i' => 'I',
            'Ş' | 'ş' => 'S',
            'Ğ' | 'ğ' => 'G',
            'Ü' | 'ü' => 'U',
            'Ö' | 'ö' => 'O',
            'Ç' | 'ç' => 'C',
            other if other.is_ascii_alphanumeric() => other.to_ascii_uppercase(),
            _ => ' ',
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
