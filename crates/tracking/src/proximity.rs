use model::{Coordinate, ProximityThreshold};
use serde::Serialize;

/// Whether `current` is within `threshold` of `destination`, measured along
/// the great circle. A distance equal to the threshold counts as arrived.
pub fn is_arrived(
    current: &Coordinate,
    destination: &Coordinate,
    threshold: ProximityThreshold,
) -> bool {
    current.distance_to(destination) <= threshold.meters()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Proximity {
    pub distance_meters: f64,
    pub threshold_meters: f64,
    pub arrived: bool,
}

/// Checks positions against a fixed destination. Stateless: reporting the
/// same position twice gives the same answer twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityMonitor {
    destination: Coordinate,
    threshold: ProximityThreshold,
}

impl ProximityMonitor {
    pub fn new(destination: Coordinate, threshold: ProximityThreshold) -> Self {
        Self {
            destination,
            threshold,
        }
    }

    pub fn destination(&self) -> Coordinate {
        self.destination
    }

    pub fn threshold(&self) -> ProximityThreshold {
        self.threshold
    }

    pub fn check(&self, current: &Coordinate) -> Proximity {
        let distance_meters = current.distance_to(&self.destination);
        Proximity {
            distance_meters,
            threshold_meters: self.threshold.meters(),
            arrived: distance_meters <= self.threshold.meters(),
        }
    }
}
