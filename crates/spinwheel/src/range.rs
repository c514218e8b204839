//! Bounded, stepped numeric range

use spinwheel_core::{Result, SpinError};

/// Most rows a wheel renders; wider ranges need a coarser step
pub const MAX_ROWS: usize = 100_000;

/// Numeric bounds and quantization step of a wheel
///
/// Invariant: all fields finite, `min <= max`, `step > 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    min: f64,
    max: f64,
    step: f64,
}

impl Range {
    /// Create a validated range
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(SpinError::InvalidRange { min, max });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(SpinError::InvalidStep(step));
        }
        Ok(Self { min, max, step })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Clamp into `[min, max]`; NaN collapses to `min`
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.max(self.min).min(self.max)
    }

    /// Round to the nearest multiple of `step`, halves rounding up
    ///
    /// Multiples are taken from zero, not from `min`, so the result is not
    /// necessarily in range; callers clamp afterwards.
    pub fn round(&self, value: f64) -> f64 {
        (value / self.step + 0.5).floor() * self.step
    }

    /// Round then clamp: the value a commit produces
    pub fn quantize(&self, value: f64) -> f64 {
        self.clamp(self.round(value))
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Number of rows from `min` to `max` inclusive, saturating at `usize::MAX`
    pub fn row_count(&self) -> usize {
        // Tolerate float noise such as (0.3 - 0.0) / 0.1 = 2.9999999999999996
        let gaps = ((self.max - self.min) / self.step + 1e-9).floor();
        // The float-to-int cast saturates, including for an infinite span
        (gaps as usize).saturating_add(1)
    }

    /// Row values, generated by index to avoid accumulated drift
    ///
    /// Stops after [`MAX_ROWS`] entries.
    pub fn rows(&self) -> Vec<f64> {
        (0..self.row_count().min(MAX_ROWS))
            .map(|i| self.min + i as f64 * self.step)
            .collect()
    }
}
