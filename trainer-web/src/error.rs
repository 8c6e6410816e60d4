//! Error types
//!
//! Only configuration problems escape as hard failures. Per-frame problems
//! (degenerate geometry, occluded joints) are absorbed by the classifier.

use thiserror::Error;

/// Setup-time failure: the session refuses to run against it.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown exercise id: {0:?}")]
    UnknownExercise(String),
    #[error("invalid profile for {exercise}: {reason}")]
    InvalidProfile { exercise: String, reason: String },
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) fn profile(exercise: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProfile {
            exercise: exercise.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Geometry failure from the angle calculator
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AngleError {
    #[error("angle undefined: coincident or non-finite joint positions")]
    UndefinedAngle,
}
