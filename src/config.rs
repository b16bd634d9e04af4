//! TOML-based advisor configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::invest::{AllocationParams, QUARTER_HOUR, StorageHeuristic};

/// Top-level advisor configuration parsed from TOML.
///
/// All fields have defaults matching the `default` preset. Load from TOML
/// with [`AdvisorConfig::from_toml_file`] or pick a preset with
/// [`AdvisorConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdvisorConfig {
    /// Grid purchase and feed-in prices.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Budget, share cap and series resolution.
    #[serde(default)]
    pub allocation: AllocationConfig,
    /// Battery benefit heuristic.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Synthetic portfolio used when no input files are given.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Grid purchase and feed-in prices.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Grid electricity price per kWh.
    pub electricity_price: f64,
    /// Feed-in tariff per exported kWh.
    pub feed_in_tariff: f64,
}

impl Default for TariffConfig {
    fn default() -> Self {
        Self {
            electricity_price: 0.30,
            feed_in_tariff: 0.05,
        }
    }
}

/// Budget, share cap and series resolution.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllocationConfig {
    /// Total investment ceiling; unbounded when absent.
    pub budget: Option<f64>,
    /// Largest share count tried per project (must be > 0).
    pub max_shares_per_project: u32,
    /// Duration of one series interval in hours.
    pub interval_hours: f64,
    /// Clamp recommendations to each project's `available_shares`.
    pub enforce_available_shares: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            budget: None,
            max_shares_per_project: 100,
            interval_hours: QUARTER_HOUR,
            enforce_available_shares: false,
        }
    }
}

/// Battery benefit heuristic.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Full cycles per year.
    pub cycles_per_year: f64,
    /// Round-trip efficiency (0.0–1.0).
    pub round_trip_efficiency: f64,
    /// Fraction of shifted energy that displaces grid purchase (0.0–1.0).
    pub grid_displacement_factor: f64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cycles_per_year: StorageHeuristic::DEFAULT_CYCLES_PER_YEAR,
            round_trip_efficiency: StorageHeuristic::DEFAULT_ROUND_TRIP_EFFICIENCY,
            grid_displacement_factor: StorageHeuristic::DEFAULT_GRID_DISPLACEMENT_FACTOR,
        }
    }
}

/// Synthetic portfolio used when no input files are given.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Number of days of synthetic data.
    pub days: usize,
    /// Master random seed.
    pub seed: u64,
    /// Mean household consumption (kW).
    pub base_load_kw: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            days: 7,
            seed: 42,
            base_load_kw: 0.8,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"allocation.max_shares_per_project"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl AdvisorConfig {
    /// Returns the daily preset: series pre-aggregated to one value per day.
    pub fn daily() -> Self {
        Self {
            allocation: AllocationConfig {
                interval_hours: 24.0,
                ..AllocationConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the no-feed-in preset: exported energy earns nothing.
    pub fn no_feed_in() -> Self {
        Self {
            tariff: TariffConfig {
                feed_in_tariff: 0.0,
                ..TariffConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "daily", "no_feed_in"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default()),
            "daily" => Ok(Self::daily()),
            "no_feed_in" => Ok(Self::no_feed_in()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut non_negative = |field: &str, value: f64| {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: format!("must be >= 0, got {value}"),
                });
            }
        };

        non_negative("tariff.electricity_price", self.tariff.electricity_price);
        non_negative("tariff.feed_in_tariff", self.tariff.feed_in_tariff);
        if let Some(budget) = self.allocation.budget {
            non_negative("allocation.budget", budget);
        }
        non_negative("storage.cycles_per_year", self.storage.cycles_per_year);

        let a = &self.allocation;
        if a.max_shares_per_project == 0 {
            errors.push(ConfigError {
                field: "allocation.max_shares_per_project".into(),
                message: "must be > 0".into(),
            });
        }
        if !(a.interval_hours.is_finite() && a.interval_hours > 0.0 && a.interval_hours <= 24.0) {
            errors.push(ConfigError {
                field: "allocation.interval_hours".into(),
                message: "must be in (0.0, 24.0]".into(),
            });
        }

        let st = &self.storage;
        if !(0.0..=1.0).contains(&st.round_trip_efficiency) {
            errors.push(ConfigError {
                field: "storage.round_trip_efficiency".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if !(0.0..=1.0).contains(&st.grid_displacement_factor) {
            errors.push(ConfigError {
                field: "storage.grid_displacement_factor".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }

        if self.demo.days == 0 {
            errors.push(ConfigError {
                field: "demo.days".into(),
                message: "must be > 0".into(),
            });
        }

        errors
    }

    /// Allocation parameters for the core engine.
    pub fn allocation_params(&self) -> AllocationParams {
        AllocationParams {
            electricity_price: self.tariff.electricity_price,
            feed_in_tariff: self.tariff.feed_in_tariff,
            budget: self.allocation.budget,
            max_shares_per_project: self.allocation.max_shares_per_project,
            interval_hours: self.allocation.interval_hours,
            storage: StorageHeuristic {
                cycles_per_year: self.storage.cycles_per_year,
                round_trip_efficiency: self.storage.round_trip_efficiency,
                grid_displacement_factor: self.storage.grid_displacement_factor,
            },
            enforce_available_shares: self.allocation.enforce_available_shares,
        }
    }
}
