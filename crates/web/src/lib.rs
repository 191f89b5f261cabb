pub use crate::common::RouteResult;

use std::sync::Arc;

use axum::{extract::FromRef, Router};
use directions::Directions;
use model::ProximityThreshold;
use notifications::NotificationSender;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracking::LocationPublisher;

pub mod api;
pub mod common;
pub mod config;
pub mod registry;

use registry::TrackerRegistry;

/// Shared state of all routes. External services that are not configured are
/// `None`; their routes answer with 503.
#[derive(Clone, FromRef)]
pub struct WebState {
    pub directions: Option<Arc<dyn Directions>>,
    pub notifications: Option<Arc<dyn NotificationSender>>,
    pub location_publisher: Option<Arc<dyn LocationPublisher>>,
    pub trackers: Arc<TrackerRegistry>,
    pub arrival_threshold: ProximityThreshold,
}

impl WebState {
    pub fn new(arrival_threshold: ProximityThreshold) -> Self {
        Self {
            directions: None,
            notifications: None,
            location_publisher: None,
            trackers: Arc::new(TrackerRegistry::default()),
            arrival_threshold,
        }
    }

    pub fn with_directions(mut self, directions: Arc<dyn Directions>) -> Self {
        self.directions = Some(directions);
        self
    }

    pub fn with_notifications(mut self, notifications: Arc<dyn NotificationSender>) -> Self {
        self.notifications = Some(notifications);
        self
    }

    pub fn with_location_publisher(mut self, publisher: Arc<dyn LocationPublisher>) -> Self {
        self.location_publisher = Some(publisher);
        self
    }
}

pub fn app(state: WebState) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(state: WebState, address: &str) -> std::io::Result<()> {
    let listener = TcpListener::bind(address).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state).into_make_service()).await?;

    Ok(())
}
