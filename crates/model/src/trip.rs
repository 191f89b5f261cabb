use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{
    location::TripLocation, notification::NotificationKind, stop::Stop, user::User,
    Coordinate, ExampleData, TransitionError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    Pending,
    Active,
    Finished,
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TripStatus::Pending => write!(f, "PENDING"),
            TripStatus::Active => write!(f, "ACTIVE"),
            TripStatus::Finished => write!(f, "FINISHED"),
        }
    }
}

/// A ride offered by a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub driver_id: Id<User>,
    pub status: TripStatus,
    pub location: TripLocation,
    #[serde(default)]
    pub stops: Vec<Stop>,
    pub departure: DateTime<Utc>,
    pub seats_available: u32,
}

impl HasId for Trip {
    type IdType = String;
}

impl Trip {
    fn transition(&mut self, to: TripStatus) -> Result<(), TransitionError> {
        let allowed = matches!(
            (self.status, to),
            (TripStatus::Pending, TripStatus::Active)
                | (TripStatus::Active, TripStatus::Finished)
        );
        if !allowed {
            return Err(TransitionError::Trip {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Marks the trip as driving. Returns the notification to send to the
    /// accepted passengers.
    pub fn start(&mut self) -> Result<NotificationKind, TransitionError> {
        self.transition(TripStatus::Active)
            .map(|_| NotificationKind::TripStarted)
    }

    pub fn finish(&mut self) -> Result<NotificationKind, TransitionError> {
        self.transition(TripStatus::Finished)
            .map(|_| NotificationKind::TripFinished)
    }

    /// Cancelling removes the trip document, so the trip is consumed. A
    /// finished trip can not be cancelled anymore.
    pub fn cancel(self) -> Result<NotificationKind, TransitionError> {
        match self.status {
            TripStatus::Finished => Err(TransitionError::FinishedTripCancelled),
            _ => Ok(NotificationKind::TripCancelled),
        }
    }

    /// Intermediate stops in driving order.
    pub fn waypoints(&self) -> Vec<Coordinate> {
        let mut stops = self.stops.iter().collect::<Vec<_>>();
        stops.sort_by_key(|stop| stop.sequence);
        stops.into_iter().map(|stop| stop.coordinate).collect()
    }

    pub fn take_seat(&mut self) -> bool {
        match self.seats_available.checked_sub(1) {
            Some(remaining) => {
                self.seats_available = remaining;
                true
            }
            None => false,
        }
    }
}

impl ExampleData for Trip {
    fn example_data() -> Self {
        let location = TripLocation::example_data();
        Self {
            driver_id: Id::new("u-jana".to_owned()),
            status: TripStatus::Pending,
            location,
            stops: vec![
                Stop::new(1, location.origin.offset(200.0, 2_000.0)).named("Hauptbahnhof")
            ],
            departure: Utc
                .with_ymd_and_hms(2024, 10, 14, 7, 30, 0)
                .single()
                .unwrap_or_else(Utc::now),
            seats_available: 3,
        }
    }
}
