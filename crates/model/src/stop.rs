use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// An intermediate waypoint of a trip.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub sequence: u32,
    pub coordinate: Coordinate,
    pub name: Option<String>,
}

impl Stop {
    pub fn new(sequence: u32, coordinate: Coordinate) -> Self {
        Self {
            sequence,
            coordinate,
            name: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
