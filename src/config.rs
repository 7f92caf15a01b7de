//! Calculator configuration
//!
//! Loaded from a JSON file (path from `--config` or `RETURNS_CONFIG`). Every field has a
//! default so a partial file, or no file at all, is valid.

use crate::error::CalcError;
use crate::investment::{lenient, ManagementFeePolicy};
use crate::withdrawal::NegativeNetPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "RETURNS_CONFIG";

/// Average year length used to turn elapsed days into holding years
pub const DEFAULT_DAYS_PER_YEAR: f64 = 365.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorConfig {
    /// Days per holding year (365.25 averages in leap years)
    #[serde(default = "default_days_per_year")]
    pub days_per_year: f64,

    /// What settlement does with a quote whose net amount is below zero
    #[serde(default)]
    pub negative_net_policy: NegativeNetPolicy,

    /// Fee applied when a request carries no management fee of its own
    #[serde(default, deserialize_with = "lenient::fee")]
    pub default_management_fee: Option<ManagementFeePolicy>,
}

fn default_days_per_year() -> f64 { DEFAULT_DAYS_PER_YEAR }

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            days_per_year: DEFAULT_DAYS_PER_YEAR,
            negative_net_policy: NegativeNetPolicy::default(),
            default_management_fee: None,
        }
    }
}

impl CalculatorConfig {
    /// Load config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CalcError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CalcError::io(path.display().to_string(), e))?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config.sanitized())
    }

    /// Load from the explicit path if given, else from `RETURNS_CONFIG`, else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self, CalcError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => Self::from_file(path),
            _ => {
                log::debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Replace a nonsensical year length with the default
    fn sanitized(mut self) -> Self {
        if !(self.days_per_year.is_finite() && self.days_per_year > 0.0) {
            log::warn!(
                "Ignoring invalid daysPerYear {}, using {}",
                self.days_per_year, DEFAULT_DAYS_PER_YEAR
            );
            self.days_per_year = DEFAULT_DAYS_PER_YEAR;
        }
        self
    }
}
