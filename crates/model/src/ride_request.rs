use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use crate::{
    notification::NotificationKind, trip::Trip, user::User, ExampleData,
    TransitionError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "PENDING"),
            RequestStatus::Accepted => write!(f, "ACCEPTED"),
            RequestStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// A passenger asking for a seat on a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RideRequest {
    pub trip_id: Id<Trip>,
    pub passenger_id: Id<User>,
    pub status: RequestStatus,
}

impl HasId for RideRequest {
    type IdType = String;
}

impl RideRequest {
    /// A fresh request. The driver is told with a `new-request` notification.
    pub fn new(trip_id: Id<Trip>, passenger_id: Id<User>) -> (Self, NotificationKind) {
        (
            Self {
                trip_id,
                passenger_id,
                status: RequestStatus::Pending,
            },
            NotificationKind::NewRequest,
        )
    }

    fn decide(&mut self, to: RequestStatus) -> Result<(), TransitionError> {
        if self.status != RequestStatus::Pending {
            return Err(TransitionError::Request {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    pub fn accept(&mut self) -> Result<NotificationKind, TransitionError> {
        self.decide(RequestStatus::Accepted)
            .map(|_| NotificationKind::RequestAccepted)
    }

    pub fn reject(&mut self) -> Result<NotificationKind, TransitionError> {
        self.decide(RequestStatus::Rejected)
            .map(|_| NotificationKind::RequestRejected)
    }
}

impl ExampleData for RideRequest {
    fn example_data() -> Self {
        Self::new(Id::new("4f1c2a9e".to_owned()), Id::new("u-tom".to_owned())).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_notifies_driver() {
        let (request, kind) =
            RideRequest::new(Id::new("t".to_owned()), Id::new("p".to_owned()));
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(kind, NotificationKind::NewRequest);
    }

    #[test]
    fn only_pending_requests_can_be_decided() {
        let mut request = RideRequest::example_data();
        assert_eq!(request.accept(), Ok(NotificationKind::RequestAccepted));
        assert_eq!(
            request.reject(),
            Err(TransitionError::Request {
                from: RequestStatus::Accepted,
                to: RequestStatus::Rejected,
            })
        );

        let mut request = RideRequest::example_data();
        assert_eq!(request.reject(), Ok(NotificationKind::RequestRejected));
        assert!(request.accept().is_err());
        assert_eq!(request.status, RequestStatus::Rejected);
    }
}
