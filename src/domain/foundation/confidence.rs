//! Confidence value object (0.0-1.0 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A score between 0.0 and 1.0 inclusive.
///
/// Scores arrive from the external detector unvalidated, so the lenient
/// constructor clamps instead of failing. NaN is treated as zero.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Zero confidence.
    pub const ZERO: Self = Self(0.0);

    /// Full confidence.
    pub const CERTAIN: Self = Self(1.0);

    /// Creates a new Confidence, clamping to valid range.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Creates a Confidence, returning error if out of range.
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::out_of_range("confidence", 0.0, 1.0, value));
        }
        Ok(Self(value))
    }

    /// Returns the value as f64.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the value as a whole percentage (0 to 100).
    pub fn as_percent(&self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_new_accepts_valid_values() {
        assert_eq!(Confidence::new(0.0).value(), 0.0);
        assert_eq!(Confidence::new(0.42).value(), 0.42);
        assert_eq!(Confidence::new(1.0).value(), 1.0);
    }

    #[test]
    fn confidence_new_clamps_out_of_range() {
        assert_eq!(Confidence::new(1.7).value(), 1.0);
        assert_eq!(Confidence::new(-0.3).value(), 0.0);
        assert_eq!(Confidence::new(f64::INFINITY).value(), 1.0);
    }

    #[test]
    fn confidence_new_treats_nan_as_zero() {
        assert_eq!(Confidence::new(f64::NAN), Confidence::ZERO);
    }

    #[test]
    fn confidence_try_new_rejects_out_of_range() {
        assert!(Confidence::try_new(0.5).is_ok());
        assert!(Confidence::try_new(1.01).is_err());
        assert!(Confidence::try_new(-0.01).is_err());
        assert!(Confidence::try_new(f64::NAN).is_err());
    }

    #[test]
    fn confidence_deserializes_with_clamping() {
        let confidence: Confidence = serde_json::from_str("1.3").unwrap();
        assert_eq!(confidence, Confidence::CERTAIN);

        let json = serde_json::to_string(&Confidence::new(0.25)).unwrap();
        assert_eq!(json, "0.25");
    }

    #[test]
    fn confidence_displays_as_percent() {
        assert_eq!(Confidence::new(0.9).to_string(), "90%");
        assert_eq!(Confidence::new(0.856).to_string(), "86%");
    }
}
