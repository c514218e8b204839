//! Spinwheel error types

use thiserror::Error;

/// Configuration and setup errors
///
/// Runtime input problems (bad keystrokes, out-of-range drags, missing
/// geometry) are never errors; they are clamped or fall back to the last
/// committed value. Only building a wheel from invalid options fails.
#[derive(Error, Debug)]
pub enum SpinError {
    /// `min` is greater than `max`, or a bound is not finite
    #[error("Invalid range: min {min} must not exceed max {max}")]
    InvalidRange { min: f64, max: f64 },

    /// `step` is zero, negative or not finite
    #[error("Invalid step: {0} (must be a positive finite number)")]
    InvalidStep(f64),

    /// Any other option that fails validation
    #[error("Invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },

    /// Failed to read a configuration file
    #[error("Failed to read {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration text
    #[error("Failed to parse options: {0}")]
    ConfigParse(String),

    /// Failed to write options back out
    #[error("Failed to serialize options: {0}")]
    ConfigSerialize(String),
}

/// Result type for spinwheel operations
pub type Result<T> = std::result::Result<T, SpinError>;
