//! Tracker configuration
//!
//! The two user-facing knobs (confidence threshold and feedback sensitivity)
//! are adjustable at runtime; debounce and hysteresis margin are tuning
//! values normally left at their defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Sensitivity at which profile penalty weights apply unscaled
pub const DEFAULT_FEEDBACK_SENSITIVITY: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Minimum landmark visibility for a joint to be trusted (0-1)
    pub confidence_threshold: f32,
    /// Scales form penalties; higher means stricter scoring (0-1)
    pub feedback_sensitivity: f32,
    /// Minimum seconds between two counted repetitions
    pub debounce_secs: f64,
    /// Minimum gap in degrees between down and up thresholds
    pub hysteresis_margin: f32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            feedback_sensitivity: DEFAULT_FEEDBACK_SENSITIVITY,
            debounce_secs: 1.0,
            hysteresis_margin: 15.0,
        }
    }
}

impl TrainerConfig {
    /// Parse from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("confidence_threshold", self.confidence_threshold)?;
        check_unit("feedback_sensitivity", self.feedback_sensitivity)?;
        if !(self.debounce_secs >= 0.0 && self.debounce_secs.is_finite()) {
            return Err(ConfigError::value(
                "debounce_secs",
                format!("must be a non-negative number of seconds, got {}", self.debounce_secs),
            ));
        }
        if !(self.hysteresis_margin >= 0.0 && self.hysteresis_margin <= 180.0) {
            return Err(ConfigError::value(
                "hysteresis_margin",
                format!("must be within 0-180 degrees, got {}", self.hysteresis_margin),
            ));
        }
        Ok(())
    }

    /// Multiplier applied to every profile penalty weight
    pub fn penalty_scale(&self) -> f32 {
        self.feedback_sensitivity / DEFAULT_FEEDBACK_SENSITIVITY
    }
}

pub(crate) fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::value(field, format!("must be within 0-1, got {}", value)))
    }
}
