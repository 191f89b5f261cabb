use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo;

use crate::ExampleData;

/// A point on the earth's surface in degrees. Latitude lies in [-90, 90] and
/// longitude in [-180, 180]; a `Coordinate` outside these ranges can not be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", try_from = "UncheckedCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<UncheckedCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(value: UncheckedCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(value.latitude, value.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    Latitude(f64),
    Longitude(f64),
}

impl error::Error for CoordinateError {}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CoordinateError::Latitude(value) => {
                write!(f, "latitude {} is not within [-90, 90]", value)
            }
            CoordinateError::Longitude(value) => {
                write!(f, "longitude {} is not within [-180, 180]", value)
            }
        }
    }
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        // written so that NaN fails the range checks
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::Longitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great circle distance in meters.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        geo::haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// The coordinate `distance_meters` away along the given initial bearing.
    pub fn offset(&self, bearing_degrees: f64, distance_meters: f64) -> Coordinate {
        let (latitude, longitude) = geo::destination_point(
            self.latitude,
            self.longitude,
            bearing_degrees,
            distance_meters,
        );
        // rounding may overshoot the poles by an ulp
        Self {
            latitude: latitude.clamp(-90.0, 90.0),
            longitude: longitude.clamp(-180.0, 180.0),
        }
    }
}

/// Formats as `latitude,longitude`, the form map services expect in query
/// strings.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl ExampleData for Coordinate {
    fn example_data() -> Self {
        Self {
            latitude: 54.3466,
            longitude: 10.1135,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(CoordinateError::Latitude(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -180.1),
            Err(CoordinateError::Longitude(-180.1))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn deserialization_validates() {
        let ok: Coordinate =
            serde_json::from_str(r#"{"latitude": 38.5, "longitude": -120.2}"#)
                .unwrap();
        assert_eq!(ok, Coordinate::new(38.5, -120.2).unwrap());

        let err = serde_json::from_str::<Coordinate>(
            r#"{"latitude": 138.5, "longitude": -120.2}"#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn offset_moves_by_distance() {
        let start = Coordinate::example_data();
        let moved = start.offset(45.0, 1000.0);
        assert!((start.distance_to(&moved) - 1000.0).abs() < 1e-6);
    }

    #[test]
    fn display_is_query_friendly() {
        let coordinate = Coordinate::new(38.5, -120.2).unwrap();
        assert_eq!(coordinate.to_string(), "38.5,-120.2");
    }
}
