use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Distance in meters below which a moving point counts as arrived.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "f64", into = "f64")]
pub struct ProximityThreshold(f64);

impl ProximityThreshold {
    pub const DEFAULT_METERS: f64 = 50.0;

    pub fn new(meters: f64) -> Result<Self, InvalidThreshold> {
        if meters.is_finite() && meters >= 0.0 {
            Ok(Self(meters))
        } else {
            Err(InvalidThreshold(meters))
        }
    }

    pub fn meters(&self) -> f64 {
        self.0
    }
}

impl Default for ProximityThreshold {
    fn default() -> Self {
        Self(Self::DEFAULT_METERS)
    }
}

impl TryFrom<f64> for ProximityThreshold {
    type Error = InvalidThreshold;

    fn try_from(meters: f64) -> Result<Self, Self::Error> {
        Self::new(meters)
    }
}

impl From<ProximityThreshold> for f64 {
    fn from(threshold: ProximityThreshold) -> Self {
        threshold.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidThreshold(pub f64);

impl error::Error for InvalidThreshold {}

impl fmt::Display for InvalidThreshold {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "proximity threshold must be a finite, nonnegative number of meters (got {})",
            self.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_zero_and_rejects_negative_or_nan() {
        assert_eq!(ProximityThreshold::new(0.0).unwrap().meters(), 0.0);
        assert!(ProximityThreshold::new(-1.0).is_err());
        assert!(ProximityThreshold::new(f64::NAN).is_err());
        assert!(ProximityThreshold::new(f64::INFINITY).is_err());
    }

    #[test]
    fn serializes_as_number() {
        let threshold = ProximityThreshold::new(75.0).unwrap();
        assert_eq!(serde_json::to_string(&threshold).unwrap(), "75.0");
        let parsed: ProximityThreshold = serde_json::from_str("75").unwrap();
        assert_eq!(parsed, threshold);
        assert!(serde_json::from_str::<ProximityThreshold>("-3").is_err());
    }
}
