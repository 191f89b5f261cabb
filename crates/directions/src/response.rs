//! The subset of the directions response that is read.

use model::route::{Route, RouteLeg};
use serde::Deserialize;

use crate::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    pub overview_polyline: EncodedPolyline,
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsLeg {
    pub distance: TextValue,
    pub duration: TextValue,
    #[serde(default)]
    pub start_address: String,
    #[serde(default)]
    pub end_address: String,
}

/// A quantity given both as a human readable text and as a number
/// (meters or seconds).
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: u64,
}

impl DirectionsResponse {
    /// Decodes the first route. Any status but `OK` is an error.
    pub fn into_route(self) -> Result<Route, ApiError> {
        match self.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(ApiError::NoRoute),
            _ => {
                return Err(ApiError::Status {
                    status: self.status,
                    message: self.error_message,
                })
            }
        }

        let route = self.routes.into_iter().next().ok_or(ApiError::NoRoute)?;
        let polyline = polyline::decode(&route.overview_polyline.points)?;
        let legs = route
            .legs
            .into_iter()
            .map(|leg| RouteLeg {
                distance_meters: leg.distance.value,
                duration_seconds: leg.duration.value,
                start_address: leg.start_address,
                end_address: leg.end_address,
            })
            .collect();

        Ok(Route::from_legs(polyline, legs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DirectionsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_first_route() {
        let route = parse(
            r#"{
                "status": "OK",
                "geocoded_waypoints": [],
                "routes": [{
                    "summary": "CA-99",
                    "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC" },
                    "legs": [{
                        "distance": { "text": "245 km", "value": 245123 },
                        "duration": { "text": "2 hours 31 mins", "value": 9060 },
                        "start_address": "A",
                        "end_address": "B"
                    }]
                }]
            }"#,
        )
        .into_route()
        .unwrap();

        assert_eq!(route.polyline.len(), 2);
        assert_eq!(route.distance_meters, 245123);
        assert_eq!(route.duration_seconds, 9060);
        assert_eq!(route.end_address(), Some("B"));
    }

    #[test]
    fn zero_results_is_no_route() {
        let result = parse(r#"{"status": "ZERO_RESULTS", "routes": []}"#).into_route();
        assert!(matches!(result, Err(ApiError::NoRoute)));
    }

    #[test]
    fn denied_request_keeps_message() {
        let result = parse(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        )
        .into_route();
        match result {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn malformed_polyline_fails_the_lookup() {
        let result = parse(
            r#"{"status": "OK", "routes": [{"overview_polyline": {"points": "_p~iF~ps|U_"}, "legs": []}]}"#,
        )
        .into_route();
        assert!(matches!(result, Err(ApiError::Polyline(_))));
    }
}
