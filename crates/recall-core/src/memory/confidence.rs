use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Validation-earned trust, clamped to [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// Starting confidence for records that have never been validated.
    pub const BASE: f64 = 0.5;
    /// Increment applied by a "useful" validation.
    pub const USEFUL_STEP: f64 = 0.10;
    /// Decrement applied by a "not useful" validation.
    pub const NOT_USEFUL_STEP: f64 = 0.05;
    /// Confidence required for promotion to critical.
    pub const PROMOTION: f64 = 0.90;

    /// Create a new Confidence, clamping to [0.0, 1.0]. NaN maps to [`Self::BASE`].
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(Self::BASE);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Apply one validation event.
    pub fn after_validation(self, useful: bool) -> Self {
        if useful {
            Self::new(self.0 + Self::USEFUL_STEP)
        } else {
            Self::new(self.0 - Self::NOT_USEFUL_STEP)
        }
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(Self::BASE)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}

impl Add for Confidence {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl Sub for Confidence {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 - rhs.0)
    }
}
