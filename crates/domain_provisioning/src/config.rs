//! Provisioning configuration
//!
//! Settings that the regulation leaves to the institution, or whose
//! regulatory citation is still pending confirmation, are read from the
//! environment (prefix `PROVISIONING_`) or a configuration file, falling
//! back to the compiled defaults.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::calibration::{OBSERVATION_FLOOR_PERCENT, OBSERVATION_WINDOW_DAYS};
use crate::error::ProvisioningError;
use crate::tables::LossCriterion;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "PROVISIONING";

/// Provisioning configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningConfig {
    /// Minimum provision percent while under post-restructuring observation
    pub observation_floor_percent: Decimal,
    /// Length of the observation window in days
    pub observation_window_days: u32,
    /// Unit used to look up the incurred-loss table
    pub incurred_criterion: LossCriterion,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            observation_floor_percent: OBSERVATION_FLOOR_PERCENT,
            observation_window_days: OBSERVATION_WINDOW_DAYS,
            incurred_criterion: LossCriterion::MonthsOverdue,
        }
    }
}

impl ProvisioningConfig {
    /// Loads configuration from the environment
    ///
    /// A `.env` file is read first when present.
    ///
    /// * `PROVISIONING_OBSERVATION_FLOOR_PERCENT` - floor percent (default: 3.0)
    /// * `PROVISIONING_OBSERVATION_WINDOW_DAYS` - window length (default: 180)
    /// * `PROVISIONING_INCURRED_CRITERION` - `months_overdue` or `days_overdue`
    pub fn from_env() -> Result<Self, ProvisioningError> {
        dotenvy::dotenv().ok();
        Self::from_environment(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Loads configuration from a file, with environment overrides on top
    pub fn from_file(path: &Path) -> Result<Self, ProvisioningError> {
        let loaded: Self = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ProvisioningError::Configuration(e.to_string()))?;

        loaded.validate()?;
        Ok(loaded)
    }

    pub(crate) fn from_environment(env: config::Environment) -> Result<Self, ProvisioningError> {
        let loaded: Self = config::Config::builder()
            .add_source(env.try_parsing(true))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ProvisioningError::Configuration(e.to_string()))?;

        loaded.validate()?;
        tracing::debug!(
            floor = %loaded.observation_floor_percent,
            window_days = loaded.observation_window_days,
            criterion = ?loaded.incurred_criterion,
            "Loaded provisioning configuration"
        );
        Ok(loaded)
    }

    /// Overrides the observation floor
    pub fn with_observation_floor(mut self, percent: Decimal) -> Self {
        self.observation_floor_percent = percent;
        self
    }

    /// Overrides the incurred-loss lookup criterion
    pub fn with_incurred_criterion(mut self, criterion: LossCriterion) -> Self {
        self.incurred_criterion = criterion;
        self
    }

    /// Rejects a floor outside `[0, 100]` and an empty window
    pub fn validate(&self) -> Result<(), ProvisioningError> {
        if self.observation_floor_percent < Decimal::ZERO
            || self.observation_floor_percent > Decimal::ONE_HUNDRED
        {
            return Err(ProvisioningError::Configuration(format!(
                "observation floor {} is outside [0, 100]",
                self.observation_floor_percent
            )));
        }

        if self.observation_window_days == 0 {
            return Err(ProvisioningError::Configuration(
                "observation window must be at least one day".to_string(),
            ));
        }

        Ok(())
    }
}
