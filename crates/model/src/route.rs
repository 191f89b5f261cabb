use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{ExampleData, Polyline};

/// Summary of one leg between two consecutive waypoints of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub distance_meters: u64,
    pub duration_seconds: u64,
    pub start_address: String,
    pub end_address: String,
}

/// A driving route as returned by the directions service, with the overview
/// polyline already decoded.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub polyline: Polyline,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    /// start of the first leg
    pub start_address: Option<String>,
    /// end of the last leg
    pub end_address: Option<String>,
    pub legs: Vec<RouteLeg>,
}

impl Route {
    /// Builds a route from its legs, totalling distance and duration.
    pub fn from_legs(polyline: Polyline, legs: Vec<RouteLeg>) -> Self {
        Self {
            polyline,
            distance_meters: legs.iter().map(|leg| leg.distance_meters).sum(),
            duration_seconds: legs.iter().map(|leg| leg.duration_seconds).sum(),
            start_address: legs.first().map(|leg| leg.start_address.clone()),
            end_address: legs.last().map(|leg| leg.end_address.clone()),
            legs,
        }
    }

    pub fn start_address(&self) -> Option<&str> {
        self.start_address.as_deref()
    }

    pub fn end_address(&self) -> Option<&str> {
        self.end_address.as_deref()
    }
}

impl ExampleData for Route {
    fn example_data() -> Self {
        Self::from_legs(
            Polyline::example_data(),
            vec![RouteLeg {
                distance_meters: 850,
                duration_seconds: 140,
                start_address: "Christian-Albrechts-Platz 4, 24118 Kiel".to_owned(),
                end_address: "Olshausenstraße 40, 24118 Kiel".to_owned(),
            }],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_over_legs() {
        let leg = |distance_meters, duration_seconds, from: &str, to: &str| RouteLeg {
            distance_meters,
            duration_seconds,
            start_address: from.to_owned(),
            end_address: to.to_owned(),
        };
        let route = Route::from_legs(
            Polyline::default(),
            vec![leg(1000, 120, "A", "B"), leg(2500, 300, "B", "C")],
        );
        assert_eq!(route.distance_meters, 3500);
        assert_eq!(route.duration_seconds, 420);
        assert_eq!(route.start_address(), Some("A"));
        assert_eq!(route.end_address(), Some("C"));

        let json = serde_json::to_value(&route).unwrap();
        assert_eq!(json["startAddress"], "A");
        assert_eq!(json["endAddress"], "C");
    }

    #[test]
    fn route_without_legs_has_no_addresses() {
        let route = Route::from_legs(Polyline::default(), vec![]);
        assert_eq!(route.start_address(), None);
        let json = serde_json::to_value(&route).unwrap();
        assert!(json.get("startAddress").is_none());
        assert_eq!(json["distanceMeters"], 0);
    }
}
