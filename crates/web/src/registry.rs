use std::collections::HashMap;

use model::trip::Trip;
use tokio::sync::RwLock;
use tracking::TrackerHandle;
use utility::id::Id;

/// A trip currently being tracked, and who to tell once it arrives.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    pub tracker: TrackerHandle,
    pub passenger_tokens: Vec<String>,
}

#[derive(Debug, Default)]
pub struct TrackerRegistry {
    sessions: RwLock<HashMap<Id<Trip>, TrackingSession>>,
}

impl TrackerRegistry {
    /// Registers a session unless the trip is tracked already.
    pub async fn insert(&self, session: TrackingSession) -> bool {
        let mut sessions = self.sessions.write().await;
        let trip_id = session.tracker.trip_id().clone();
        if sessions.contains_key(&trip_id) {
            return false;
        }
        sessions.insert(trip_id, session);
        true
    }

    pub async fn get(&self, trip_id: &Id<Trip>) -> Option<TrackingSession> {
        self.sessions.read().await.get(trip_id).cloned()
    }

    pub async fn remove(&self, trip_id: &Id<Trip>) -> Option<TrackingSession> {
        self.sessions.write().await.remove(trip_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
