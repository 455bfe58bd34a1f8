// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decimal-safe clamping, rounding and stepping.
//!
//! Values are stepped as whole multiples of `10^-precision`: both the value and
//! the step are scaled to integers (held exactly in an `f64`), added, and
//! divided back once. Drift never accumulates across steps.

use trellis_dom::ConfigError;

/// Largest supported number of fractional digits.
pub const MAX_PRECISION: u32 = 12;

/// Bounds, step and precision of a numeric value.
///
/// ```rust
/// use trellis_behaviors::NumericRange;
///
/// let range = NumericRange::new(0.0, 1.0, 0.1, None).unwrap();
/// assert_eq!(range.precision(), 1);
///
/// let mut v = 0.0;
/// for _ in 0..10 {
///     v = range.step_by(v, 1.0);
/// }
/// assert_eq!(v, 1.0);
/// // Past the end saturates exactly on the bound.
/// assert_eq!(range.step_by(v, 5.0), 1.0);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NumericRange {
    min: f64,
    max: f64,
    step: f64,
    precision: u32,
    scale: f64,
}

impl NumericRange {
    /// Validate and build a range.
    ///
    /// Bounds may be infinite. Without an explicit precision, the number of
    /// fractional digits in `step` is used.
    pub fn new(min: f64, max: f64, step: f64, precision: Option<u32>) -> Result<Self, ConfigError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(ConfigError::InvalidRange { min, max });
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::InvalidStep(step));
        }
        let precision = match precision {
            Some(p) if p > MAX_PRECISION => return Err(ConfigError::InvalidPrecision(p)),
            Some(p) => p,
            None => fraction_digits(step),
        };
        Ok(Self {
            min,
            max,
            step,
            precision,
            scale: (0..precision).fold(1.0, |s, _| s * 10.0),
        })
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Step size.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Fractional digits kept.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// Saturate into `[min, max]`. NaN maps to the bound closest to zero.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return 0.0_f64.clamp(self.min, self.max);
        }
        value.clamp(self.min, self.max)
    }

    /// Round to `precision` fractional digits.
    pub fn round(&self, value: f64) -> f64 {
        let scaled = value * self.scale;
        if !scaled.is_finite() {
            return value;
        }
        scaled.round() / self.scale
    }

    /// Round, then clamp. The result always lies within the bounds.
    pub fn normalize(&self, value: f64) -> f64 {
        self.clamp(self.round(value))
    }

    /// Move `value` by `steps` steps (negative moves down) and clamp.
    pub fn step_by(&self, value: f64, steps: f64) -> f64 {
        let units = (value * self.scale).round();
        let step_units = (self.step * self.scale).round().max(1.0);
        self.clamp((units + step_units * steps) / self.scale)
    }

    /// Snap to the nearest multiple of `step` counted from `min` (or zero for
    /// an unbounded minimum), then clamp.
    pub fn snap(&self, value: f64) -> f64 {
        let origin = if self.min.is_finite() { self.min } else { 0.0 };
        let origin_units = (origin * self.scale).round();
        let step_units = (self.step * self.scale).round().max(1.0);
        let units = (value * self.scale).round();
        let k = ((units - origin_units) / step_units).round();
        self.clamp((origin_units + k * step_units) / self.scale)
    }

    /// Returns a copy with new bounds.
    pub fn with_bounds(&self, min: f64, max: f64) -> Result<Self, ConfigError> {
        Self::new(min, max, self.step, Some(self.precision))
    }
}

fn fraction_digits(step: f64) -> u32 {
    let text = step.to_string();
    text.split_once('.').map_or(0, |(_, frac)| {
        u32::try_from(frac.len()).map_or(MAX_PRECISION, |n| n.min(MAX_PRECISION))
    })
}
