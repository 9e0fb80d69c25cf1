//! Coordinate plausibility envelope.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default LV95 easting range (inclusive).
pub const LV95_X_MIN: f64 = 2_480_000.0;
pub const LV95_X_MAX: f64 = 2_840_000.0;

/// Default LV95 northing range (inclusive).
pub const LV95_Y_MIN: f64 = 1_070_000.0;
pub const LV95_Y_MAX: f64 = 1_300_000.0;

/// Rectangular range of coordinates considered geographically plausible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateEnvelope {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

/// The first axis of a point found outside the envelope.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum EnvelopeViolation {
    #[error("X coordinate {value} outside plausible range [{min}, {max}]")]
    X { value: f64, min: f64, max: f64 },

    #[error("Y coordinate {value} outside plausible range [{min}, {max}]")]
    Y { value: f64, min: f64, max: f64 },
}

impl Default for CoordinateEnvelope {
    fn default() -> Self {
        Self {
            x_min: LV95_X_MIN,
            x_max: LV95_X_MAX,
            y_min: LV95_Y_MIN,
            y_max: LV95_Y_MAX,
        }
    }
}

impl CoordinateEnvelope {
    /// Build a custom envelope. Each range must be finite and non-empty.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, CoreError> {
        let ordered = |min: f64, max: f64| min.is_finite() && max.is_finite() && min <= max;
        if !ordered(x_min, x_max) {
            return Err(CoreError::Validation(format!(
                "invalid X range [{x_min}, {x_max}]"
            )));
        }
        if !ordered(y_min, y_max) {
            return Err(CoreError::Validation(format!(
                "invalid Y range [{y_min}, {y_max}]"
            )));
        }
        Ok(Self {
            x_min,
            x_max,
            y_min,
            y_max,
        })
    }

    /// Check a point against the envelope.
    ///
    /// X is checked before Y; when X fails, Y is not looked at. NaN never
    /// passes.
    pub fn check(&self, x: f64, y: f64) -> Result<(), EnvelopeViolation> {
        self.check_x(x)?;
        self.check_y(y)
    }

    pub fn check_x(&self, x: f64) -> Result<(), EnvelopeViolation> {
        if (self.x_min..=self.x_max).contains(&x) {
            Ok(())
        } else {
            Err(EnvelopeViolation::X {
                value: x,
                min: self.x_min,
                max: self.x_max,
            })
        }
    }

    pub fn check_y(&self, y: f64) -> Result<(), EnvelopeViolation> {
        if (self.y_min..=self.y_max).contains(&y) {
            Ok(())
        } else {
            Err(EnvelopeViolation::Y {
                value: y,
                min: self.y_min,
                max: self.y_max,
            })
        }
    }
}
