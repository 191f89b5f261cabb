use std::{error, fmt, sync::Arc};

use model::{location::LiveLocation, trip::Trip, Coordinate, ProximityThreshold};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use utility::id::Id;

use crate::{proximity::ProximityMonitor, realtime::LocationPublisher};

const MAILBOX_CAPACITY: usize = 32;
const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "event",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum TrackingEvent {
    Moved {
        trip_id: Id<Trip>,
        location: LiveLocation,
        distance_meters: f64,
    },
    /// Sent once per trip, for the first position within the threshold.
    Completed {
        trip_id: Id<Trip>,
        location: LiveLocation,
    },
}

impl TrackingEvent {
    pub fn is_completed(&self) -> bool {
        matches!(self, TrackingEvent::Completed { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrackingEvent::Moved { .. } => "moved",
            TrackingEvent::Completed { .. } => "completed",
        }
    }
}

/// Turns the stateless proximity check into a one-time "trip completed"
/// transition.
#[derive(Debug, Clone)]
pub struct TripTracker {
    trip_id: Id<Trip>,
    monitor: ProximityMonitor,
    completed: bool,
}

impl TripTracker {
    pub fn new(
        trip_id: Id<Trip>,
        destination: Coordinate,
        threshold: ProximityThreshold,
    ) -> Self {
        Self {
            trip_id,
            monitor: ProximityMonitor::new(destination, threshold),
            completed: false,
        }
    }

    pub fn trip_id(&self) -> &Id<Trip> {
        &self.trip_id
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn update(&mut self, location: LiveLocation) -> Vec<TrackingEvent> {
        let proximity = self.monitor.check(&location.coordinate);
        let mut events = vec![TrackingEvent::Moved {
            trip_id: self.trip_id.clone(),
            location,
            distance_meters: proximity.distance_meters,
        }];

        if proximity.arrived && !self.completed {
            self.completed = true;
            events.push(TrackingEvent::Completed {
                trip_id: self.trip_id.clone(),
                location,
            });
        }

        events
    }
}

#[derive(Debug)]
pub enum TrackerError {
    /// The tracker task is gone.
    Stopped,
    NoAnswer(oneshot::error::RecvError),
}

impl error::Error for TrackerError {}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TrackerError::Stopped => write!(f, "tracker is not running anymore"),
            TrackerError::NoAnswer(why) => write!(f, "tracker did not answer: {}", why),
        }
    }
}

enum Command {
    Report {
        location: LiveLocation,
        respond_to: oneshot::Sender<Vec<TrackingEvent>>,
    },
}

/// Handle to a running tracker task. Cloning is cheap; the task stops once
/// every handle is dropped.
#[derive(Clone)]
pub struct TrackerHandle {
    trip_id: Id<Trip>,
    sender: mpsc::Sender<Command>,
    events: broadcast::Sender<TrackingEvent>,
}

impl TrackerHandle {
    pub fn trip_id(&self) -> &Id<Trip> {
        &self.trip_id
    }

    /// Feeds a position to the tracker and waits for the events it caused.
    pub async fn report(
        &self,
        location: LiveLocation,
    ) -> Result<Vec<TrackingEvent>, TrackerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(Command::Report {
                location,
                respond_to,
            })
            .await
            .map_err(|_| TrackerError::Stopped)?;
        response.await.map_err(TrackerError::NoAnswer)
    }

    /// Events of all positions reported after subscribing.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackingEvent> {
        self.events.subscribe()
    }
}

impl fmt::Debug for TrackerHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TrackerHandle")
            .field("trip_id", &self.trip_id)
            .finish()
    }
}

/// Publishes the latest reported position of a trip on its own task. While a
/// publish is in flight newer positions replace older ones, so a slow channel
/// skips positions instead of queueing them.
fn spawn_publisher(
    trip_id: Id<Trip>,
    publisher: Arc<dyn LocationPublisher>,
) -> watch::Sender<Option<LiveLocation>> {
    let (latest, mut receiver) = watch::channel(None);

    tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let location = *receiver.borrow_and_update();
            if let Some(location) = location {
                if let Err(why) = publisher.publish(&trip_id, &location).await {
                    log::warn!("could not publish location of trip '{}': {}", trip_id, why);
                }
            }
        }
    });

    latest
}

/// Runs a tracker on its own task. Every reported position is also handed to
/// `publisher`, if there is one. Publishing happens on a separate task, so
/// neither slow publishing nor its failures hold up tracking.
pub fn spawn(
    mut tracker: TripTracker,
    publisher: Option<Arc<dyn LocationPublisher>>,
) -> TrackerHandle {
    let (sender, mut receiver) = mpsc::channel(MAILBOX_CAPACITY);
    let (events, _) = broadcast::channel(EVENT_CAPACITY);
    let trip_id = tracker.trip_id().clone();
    let latest_location =
        publisher.map(|publisher| spawn_publisher(trip_id.clone(), publisher));

    let task_events = events.clone();
    tokio::spawn(async move {
        while let Some(command) = receiver.recv().await {
            match command {
                Command::Report {
                    location,
                    respond_to,
                } => {
                    if let Some(latest_location) = &latest_location {
                        latest_location.send_replace(Some(location));
                    }

                    let emitted = tracker.update(location);
                    for event in emitted.iter() {
                        if event.is_completed() {
                            log::info!("trip '{}' reached its destination", tracker.trip_id());
                        }
                        // nobody listening is fine
                        let _ = task_events.send(event.clone());
                    }

                    respond_to
                        .send(emitted)
                        .unwrap_or_else(|_| log::error!("Can not respond to location report!"));
                }
            }
        }
        log::debug!("tracker for trip '{}' stopped", tracker.trip_id());
    });

    TrackerHandle {
        trip_id,
        sender,
        events,
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use async_trait::async_trait;
    use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::realtime::{ChannelError, RealtimeChannel, RealtimeChannelConfig};

    fn destination() -> Coordinate {
        Coordinate::new(54.3393, 10.1225).unwrap()
    }

    fn tracker() -> TripTracker {
        TripTracker::new(
            Id::new("t-1".to_owned()),
            destination(),
            ProximityThreshold::default(),
        )
    }

    fn at(meters_from_destination: f64) -> LiveLocation {
        LiveLocation::now(destination().offset(270.0, meters_from_destination))
    }

    #[test]
    fn completes_exactly_once() {
        let mut tracker = tracker();

        let far = tracker.update(at(800.0));
        assert_eq!(far.len(), 1);
        assert!(!tracker.is_completed());

        let arrived = tracker.update(at(20.0));
        assert_eq!(arrived.len(), 2);
        assert!(arrived[1].is_completed());
        assert!(tracker.is_completed());

        // standing around near the destination does not fire again
        for meters in [10.0, 0.0, 5.0] {
            let events = tracker.update(at(meters));
            assert!(events.iter().all(|event| !event.is_completed()));
        }
    }

    #[test]
    fn moved_event_carries_distance() {
        let mut tracker = tracker();
        match &tracker.update(at(400.0))[0] {
            TrackingEvent::Moved {
                distance_meters, ..
            } => assert!((distance_meters - 400.0).abs() < 1e-6),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn event_wire_format() {
        let mut tracker = tracker();
        let events = tracker.update(at(0.0));
        let json = serde_json::to_value(&events[1]).unwrap();
        assert_eq!(json["event"], "completed");
        assert_eq!(json["tripId"], "t-1");
        assert!(json["location"]["recordedAt"].is_string());
    }

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<(String, LiveLocation)>>,
    }

    #[async_trait]
    impl LocationPublisher for RecordingPublisher {
        async fn publish(
            &self,
            trip_id: &Id<Trip>,
            location: &LiveLocation,
        ) -> Result<(), ChannelError> {
            self.published
                .lock()
                .unwrap()
                .push((trip_id.to_string(), *location));
            Ok(())
        }
    }

    struct FailingPublisher;

    #[async_trait]
    impl LocationPublisher for FailingPublisher {
        async fn publish(
            &self,
            _trip_id: &Id<Trip>,
            _location: &LiveLocation,
        ) -> Result<(), ChannelError> {
            Err(ChannelError::InvalidUrl("nowhere".to_owned()))
        }
    }

    #[tokio::test]
    async fn task_publishes_and_broadcasts() {
        let publisher = Arc::new(RecordingPublisher::default());
        let handle = spawn(tracker(), Some(publisher.clone()));
        let mut events = handle.subscribe();

        let reported = handle.report(at(300.0)).await.unwrap();
        assert_eq!(reported.len(), 1);
        assert_eq!(events.recv().await.unwrap(), reported[0]);

        let last = at(0.0);
        let reported = handle.report(last).await.unwrap();
        assert!(reported[1].is_completed());
        assert_eq!(events.recv().await.unwrap().name(), "moved");
        assert_eq!(events.recv().await.unwrap().name(), "completed");

        // positions may be coalesced, but the latest one is always published
        let expected = ("t-1".to_owned(), last);
        let published = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let published = publisher.published.lock().unwrap().clone();
                if published.last() == Some(&expected) {
                    break published;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        assert!(published.len() <= 2);
    }

    #[tokio::test]
    async fn publish_failure_does_not_stop_tracking() {
        let handle = spawn(tracker(), Some(Arc::new(FailingPublisher)));
        let reported = handle.report(at(0.0)).await.unwrap();
        assert!(reported.iter().any(TrackingEvent::is_completed));

        let again = handle.report(at(0.0)).await.unwrap();
        assert!(!again.iter().any(TrackingEvent::is_completed));
    }

    #[tokio::test]
    async fn slow_channel_does_not_delay_reports() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;
        let channel = RealtimeChannel::new(RealtimeChannelConfig {
            base_url: server.uri(),
            auth_token: None,
        });
        let handle = spawn(tracker(), Some(Arc::new(channel)));

        let reports = async {
            handle.report(at(600.0)).await.unwrap();
            handle.report(at(300.0)).await.unwrap();
            handle.report(at(0.0)).await.unwrap()
        };
        let arrived = tokio::time::timeout(Duration::from_secs(3), reports)
            .await
            .expect("reports waited for the realtime channel");
        assert!(arrived.iter().any(TrackingEvent::is_completed));
    }
}
