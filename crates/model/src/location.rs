use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Coordinate, ExampleData};

/// Where a trip starts and where it ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripLocation {
    pub origin: Coordinate,
    pub destination: Coordinate,
}

impl TripLocation {
    pub fn new(origin: Coordinate, destination: Coordinate) -> Self {
        Self {
            origin,
            destination,
        }
    }

    /// Straight line distance between origin and destination in meters.
    pub fn direct_distance_meters(&self) -> f64 {
        self.origin.distance_to(&self.destination)
    }
}

impl ExampleData for TripLocation {
    fn example_data() -> Self {
        let origin = Coordinate::example_data();
        Self::new(origin, origin.offset(200.0, 4_500.0))
    }
}

/// A position sample of a driver during an active trip, as written to the
/// realtime location channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LiveLocation {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub recorded_at: DateTime<Utc>,
}

impl LiveLocation {
    pub fn new(coordinate: Coordinate, recorded_at: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            recorded_at,
        }
    }

    pub fn now(coordinate: Coordinate) -> Self {
        Self::new(coordinate, Utc::now())
    }
}
