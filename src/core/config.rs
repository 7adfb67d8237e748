/*!
 * Simulation Configuration
 *
 * Tunables for the admission controller and the scheduler. Loaded from JSON,
 * then optionally overridden from the environment.
 */

use super::errors::ConfigError;
use super::limits::{DEFAULT_LEDGER_CAPACITY, DEFAULT_TIME_SLICE, MIN_VECTOR_CAPACITY};
use crate::resources::SystemCapacity;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Environment variable overriding the round-robin time slice
pub const ENV_TIME_SLICE: &str = "KERNEL_TIME_SLICE";

/// Environment variable overriding the initial ledger capacity
pub const ENV_LEDGER_CAPACITY: &str = "KERNEL_LEDGER_CAPACITY";

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulationConfig {
    /// Round-robin quantum (default: 5.0)
    pub time_slice: f64,

    /// Initial backing capacity of resource vectors (default: 10)
    pub vector_capacity: usize,

    /// Initial capacity of the admission ledger (default: 5)
    pub ledger_capacity: usize,

    /// Total system capacity per resource kind
    pub capacity: SystemCapacity,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_slice: DEFAULT_TIME_SLICE,
            vector_capacity: MIN_VECTOR_CAPACITY,
            ledger_capacity: DEFAULT_LEDGER_CAPACITY,
            capacity: SystemCapacity::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded simulation config");
        Self::from_json_str(&contents)
    }

    /// Apply `KERNEL_TIME_SLICE` / `KERNEL_LEDGER_CAPACITY` if set
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(
            std::env::var(ENV_TIME_SLICE).ok().as_deref(),
            std::env::var(ENV_LEDGER_CAPACITY).ok().as_deref(),
        )
    }

    fn with_overrides(
        mut self,
        time_slice: Option<&str>,
        ledger_capacity: Option<&str>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = time_slice {
            self.time_slice = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{}={} is not a number", ENV_TIME_SLICE, raw))
            })?;
            warn!(time_slice = self.time_slice, "Time slice overridden from environment");
        }
        if let Some(raw) = ledger_capacity {
            self.ledger_capacity = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{}={} is not a count", ENV_LEDGER_CAPACITY, raw))
            })?;
            warn!(
                ledger_capacity = self.ledger_capacity,
                "Ledger capacity overridden from environment"
            );
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.time_slice.is_finite() || self.time_slice <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "time_slice must be a positive number, got {}",
                self.time_slice
            )));
        }
        if self.vector_capacity < MIN_VECTOR_CAPACITY {
            return Err(ConfigError::Invalid(format!(
                "vector_capacity must be at least {}, got {}",
                MIN_VECTOR_CAPACITY, self.vector_capacity
            )));
        }
        if let Some((kind, amount)) = self.capacity.iter().find(|(_, amount)| *amount < 0) {
            return Err(ConfigError::Invalid(format!(
                "capacity for {} must not be negative, got {}",
                kind, amount
            )));
        }
        Ok(())
    }
}
