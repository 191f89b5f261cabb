use std::{error, fmt, fmt::Debug};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

use ride_request::RequestStatus;
use trip::TripStatus;

pub mod coordinate;
pub mod location;
pub mod notification;
pub mod polyline;
pub mod ride_request;
pub mod route;
pub mod stop;
pub mod threshold;
pub mod trip;
pub mod user;

pub use coordinate::{Coordinate, CoordinateError};
pub use polyline::Polyline;
pub use threshold::ProximityThreshold;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// A document together with the key it is stored under.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(bound(
    serialize = "V: Serialize, V::IdType: Serialize",
    deserialize = "V: Deserialize<'de>, V::IdType: Deserialize<'de>"
))]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}

impl<V> ExampleData for WithId<V>
where
    V: HasId + ExampleData,
    V::IdType: Debug + Clone + From<&'static str>,
{
    fn example_data() -> Self {
        Self::new(Id::new("4f1c2a9e".into()), V::example_data())
    }
}

/// A status change that the document's lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    Trip { from: TripStatus, to: TripStatus },
    Request { from: RequestStatus, to: RequestStatus },
    FinishedTripCancelled,
}

impl error::Error for TransitionError {}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TransitionError::Trip { from, to } => {
                write!(f, "trip can not change from {} to {}", from, to)
            }
            TransitionError::Request { from, to } => {
                write!(f, "ride request can not change from {} to {}", from, to)
            }
            TransitionError::FinishedTripCancelled => {
                write!(f, "a finished trip can not be cancelled")
            }
        }
    }
}
