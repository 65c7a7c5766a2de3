//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Reconciliation thresholds.
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Thresholds used when reconciling a shift.
///
/// The defaults are the fixed business thresholds: a gap under one currency
/// unit is balanced, a gap under one percent of system sales is minor.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationConfig {
    /// Absolute difference below which a shift is balanced.
    #[serde(default = "default_balanced_tolerance")]
    pub balanced_tolerance: Decimal,
    /// Percentage of system sales below which a difference is minor.
    #[serde(default = "default_minor_percent_threshold")]
    pub minor_percent_threshold: Decimal,
    /// Allowed litre gap between a pump meter delta and its summed sales.
    #[serde(default = "default_pump_index_tolerance")]
    pub pump_index_tolerance: Decimal,
    /// Whether every attendant with automation sales must hand in a cash slip.
    #[serde(default = "default_require_slip_per_attendant")]
    pub require_slip_per_attendant: bool,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            balanced_tolerance: default_balanced_tolerance(),
            minor_percent_threshold: default_minor_percent_threshold(),
            pump_index_tolerance: default_pump_index_tolerance(),
            require_slip_per_attendant: default_require_slip_per_attendant(),
        }
    }
}

fn default_balanced_tolerance() -> Decimal {
    Decimal::ONE
}

fn default_minor_percent_threshold() -> Decimal {
    Decimal::ONE
}

fn default_pump_index_tolerance() -> Decimal {
    Decimal::new(50, 2)
}

fn default_require_slip_per_attendant() -> bool {
    true
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `FUELBOOK__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FUELBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
