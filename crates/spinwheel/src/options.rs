//! Wheel options
//!
//! Options can be built in code with the builder setters or loaded from a
//! TOML table; every field is optional and falls back to its default:
//!
//! ```toml
//! min = 0
//! max = 100
//! default = 10
//! step = 0.5
//! direction = "right"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spinwheel_core::{Result, SpinError};

use crate::position::Direction;
use crate::range::{Range, MAX_ROWS};

/// Configuration for a single wheel
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpinnerOptions {
    /// Lowest selectable value
    pub min: f64,
    /// Highest selectable value
    pub max: f64,
    /// Value shown before the user interacts
    #[serde(rename = "default")]
    pub initial: f64,
    /// Distance between adjacent rows
    pub step: f64,
    /// Preferred side of the anchor
    pub direction: Direction,
    /// Value change per dragged pixel
    pub speed: f64,
    /// Take anchor geometry from this element instead of the anchor itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Height of one row in pixels
    pub spin_number_height: f32,
    /// Delay between anchor blur and hiding the wheel
    pub blur_grace_ms: u64,
    /// Inactivity period after which an active wheel commits
    pub idle_timeout_ms: u64,
    /// Downgrade `left` placements that would leave the viewport
    pub guard_left_edge: bool,
}

impl Default for SpinnerOptions {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
            initial: 10.0,
            step: 0.5,
            direction: Direction::Right,
            speed: 1.0 / 27.0,
            selector: None,
            spin_number_height: 30.0,
            blur_grace_ms: 100,
            idle_timeout_ms: 2500,
            guard_left_edge: false,
        }
    }
}

impl SpinnerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both bounds
    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Set the initial value
    pub fn initial(mut self, value: f64) -> Self {
        self.initial = value;
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn spin_number_height(mut self, height: f32) -> Self {
        self.spin_number_height = height;
        self
    }

    pub fn blur_grace_ms(mut self, ms: u64) -> Self {
        self.blur_grace_ms = ms;
        self
    }

    pub fn idle_timeout_ms(mut self, ms: u64) -> Self {
        self.idle_timeout_ms = ms;
        self
    }

    pub fn guard_left_edge(mut self, enabled: bool) -> Self {
        self.guard_left_edge = enabled;
        self
    }

    /// Check every field and build the value range
    pub fn validate(&self) -> Result<Range> {
        let range = Range::new(self.min, self.max, self.step)?;
        let rows = range.row_count();
        if rows > MAX_ROWS {
            return Err(SpinError::InvalidOption {
                name: "step",
                reason: format!(
                    "{} yields {} rows between {} and {}, at most {} are allowed",
                    self.step, rows, self.min, self.max, MAX_ROWS
                ),
            });
        }

        if !self.speed.is_finite() {
            return Err(SpinError::InvalidOption {
                name: "speed",
                reason: format!("{} is not a finite number", self.speed),
            });
        }
        if !self.spin_number_height.is_finite() || self.spin_number_height <= 0.0 {
            return Err(SpinError::InvalidOption {
                name: "spin_number_height",
                reason: format!("{} must be a positive number", self.spin_number_height),
            });
        }

        Ok(range)
    }

    /// Parse options from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SpinError::ConfigParse(e.to_string()))
    }

    /// Load options from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SpinError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        let options = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded spinner options");
        Ok(options)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SpinError::ConfigSerialize(e.to_string()))
    }
}
