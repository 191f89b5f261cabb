use std::sync::Arc;

use directions::{DirectionsClient, DirectionsCredentials};
use notifications::{PushDispatcher, PushDispatcherConfig};
use tracking::{RealtimeChannel, RealtimeChannelConfig};
use web::{config::WebConfig, start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = WebConfig::from_env().expect("invalid web configuration in env.");
    let mut state = WebState::new(config.arrival_threshold);

    // directions
    match DirectionsCredentials::from_env() {
        Some(credentials) => {
            state = state.with_directions(Arc::new(DirectionsClient::new(&credentials)));
        }
        None => log::warn!("GOOGLE_MAPS_API_KEY not set, route lookups are disabled."),
    }

    // push notifications
    match PushDispatcherConfig::from_env() {
        Some(dispatcher_config) => {
            state = state.with_notifications(Arc::new(PushDispatcher::new(dispatcher_config)));
        }
        None => log::warn!("PUSH_FUNCTION_URL not set, notifications are disabled."),
    }

    // realtime location channel
    match RealtimeChannelConfig::from_env() {
        Some(channel_config) => {
            state = state.with_location_publisher(Arc::new(RealtimeChannel::new(channel_config)));
        }
        None => log::warn!("REALTIME_DATABASE_URL not set, live locations are not published."),
    }

    if let Err(why) = start_web_server(state, &config.bind_address).await {
        log::error!("web server stopped: {}", why);
    }
}
