//! Configuration for the core crate
//!
//! This module provides the settings the contracts are deployed with: the
//! authority-controlled initial trust value and the optional registry check on
//! event submission.

use serde::{Serialize, Deserialize};
use crate::error::HostError;

/// Default trust every vehicle starts with
pub const DEFAULT_INITIAL_TRUST: f64 = 100.0;

/// Trust engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Value written by `InitTrust`, regardless of what the caller supplies
    pub initial_value: f64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        TrustConfig {
            initial_value: DEFAULT_INITIAL_TRUST,
        }
    }
}

/// Event log configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Reject events from cars the car registry does not know
    pub require_registered_car: bool,
}

/// Core configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Trust engine configuration
    pub trust: TrustConfig,

    /// Event log configuration
    pub events: EventConfig,

    /// Default log filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            trust: TrustConfig::default(),
            events: EventConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl CoreConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self, HostError> {
        let file = std::fs::File::open(path)?;
        let config: CoreConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &str) -> Result<(), HostError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Check that the configuration can be deployed
    pub fn validate(&self) -> Result<(), HostError> {
        if !self.trust.initial_value.is_finite() {
            return Err(HostError::Config(format!(
                "trust.initial_value must be finite, got {}",
                self.trust.initial_value
            )));
        }
        Ok(())
    }

    /// Create a development configuration
    pub fn development() -> Self {
        let mut config = Self::default();
        config.log_level = "debug".to_string();
        config
    }

    /// Create a production configuration
    pub fn production() -> Self {
        let mut config = Self::default();
        config.log_level = "info".to_string();
        config.events.require_registered_car = true;
        config
    }

    /// Create a testing configuration
    pub fn testing() -> Self {
        let mut config = Self::default();
        config.log_level = "debug".to_string();
        config
    }
}
