pub mod proximity;
pub mod realtime;
pub mod tracker;

pub use proximity::{is_arrived, Proximity, ProximityMonitor};
pub use realtime::{ChannelError, LocationPublisher, RealtimeChannel, RealtimeChannelConfig};
pub use tracker::{TrackerError, TrackerHandle, TrackingEvent, TripTracker};
