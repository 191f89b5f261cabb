use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, State},
    http::{Method, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, on, post},
    Json, Router,
};
use futures::stream::Stream;
use model::{
    location::LiveLocation,
    notification::{Notification, NotificationKind},
    trip::Trip,
    Coordinate, ProximityThreshold, WithId,
};
use notifications::NotificationSender;
use serde::{Deserialize, Serialize};
use tokio_stream::{wrappers::BroadcastStream, StreamExt as _};
use tracking::{tracker, TrackingEvent, TripTracker};
use utility::id::Id;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, METHOD_FILTER_ALL},
    registry::{TrackerRegistry, TrackingSession},
    RouteResult, WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<WithId<Trip>>))
        .route(
            "/:trip_id/tracking",
            post(start_tracking).delete(stop_tracking),
        )
        .route("/:trip_id/location", post(report_location))
        .route("/:trip_id/events", get(tracking_events))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartTracking {
    destination: Coordinate,
    threshold_meters: Option<ProximityThreshold>,
    #[serde(default)]
    passenger_tokens: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackingStarted {
    trip_id: Id<Trip>,
    destination: Coordinate,
    threshold_meters: ProximityThreshold,
}

async fn start_tracking(
    OriginalUri(original_uri): OriginalUri,
    State(state): State<WebState>,
    Path(trip_id): Path<String>,
    Json(request): Json<StartTracking>,
) -> RouteResult<(StatusCode, Json<TrackingStarted>)> {
    let trip_id: Id<Trip> = Id::new(trip_id);
    let threshold = request.threshold_meters.unwrap_or(state.arrival_threshold);

    let tracker = tracker::spawn(
        TripTracker::new(trip_id.clone(), request.destination, threshold),
        state.location_publisher.clone(),
    );
    let inserted = state
        .trackers
        .insert(TrackingSession {
            tracker,
            passenger_tokens: request.passenger_tokens,
        })
        .await;
    if !inserted {
        return Err(RouteErrorResponse::new(StatusCode::CONFLICT)
            .with_method(&Method::POST)
            .with_uri(original_uri.path())
            .with_message(format!("Trip '{}' is tracked already.", trip_id)));
    }

    log::info!("tracking trip '{}'", trip_id);
    Ok((
        StatusCode::CREATED,
        Json(TrackingStarted {
            trip_id,
            destination: request.destination,
            threshold_meters: threshold,
        }),
    ))
}

async fn find_session(
    trackers: &TrackerRegistry,
    trip_id: &Id<Trip>,
    method: &Method,
    uri: &str,
) -> RouteResult<TrackingSession> {
    trackers
        .get(trip_id)
        .await
        .ok_or_else(|| not_tracked(trip_id, method, uri))
}

fn not_tracked(trip_id: &Id<Trip>, method: &Method, uri: &str) -> RouteErrorResponse {
    RouteErrorResponse::not_found(method, uri)
        .with_message(format!("Trip '{}' is not being tracked.", trip_id))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LocationReport {
    events: Vec<TrackingEvent>,
}

async fn report_location(
    OriginalUri(original_uri): OriginalUri,
    State(state): State<WebState>,
    Path(trip_id): Path<String>,
    Json(coordinate): Json<Coordinate>,
) -> RouteResult<Json<LocationReport>> {
    let trip_id: Id<Trip> = Id::new(trip_id);
    let session =
        find_session(&state.trackers, &trip_id, &Method::POST, original_uri.path()).await?;

    let events = session
        .tracker
        .report(LiveLocation::now(coordinate))
        .await?;

    if events.iter().any(TrackingEvent::is_completed) {
        // the trip is over, which stops the tracker once the last handle is gone
        state.trackers.remove(&trip_id).await;
        if let Some(notifications) = &state.notifications {
            notify_passengers(
                notifications.as_ref(),
                NotificationKind::TripFinished,
                &trip_id,
                session.passenger_tokens,
            )
            .await;
        }
    }

    Ok(Json(LocationReport { events }))
}

/// Stops tracking a trip that will not reach its destination, e.g. because it
/// was cancelled. Passengers are told that the trip is cancelled.
async fn stop_tracking(
    OriginalUri(original_uri): OriginalUri,
    State(state): State<WebState>,
    Path(trip_id): Path<String>,
) -> RouteResult<StatusCode> {
    let trip_id: Id<Trip> = Id::new(trip_id);
    let session = state
        .trackers
        .remove(&trip_id)
        .await
        .ok_or_else(|| not_tracked(&trip_id, &Method::DELETE, original_uri.path()))?;

    log::info!("stopped tracking trip '{}'", trip_id);
    if let Some(notifications) = &state.notifications {
        notify_passengers(
            notifications.as_ref(),
            NotificationKind::TripCancelled,
            &trip_id,
            session.passenger_tokens,
        )
        .await;
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn notify_passengers(
    notifications: &dyn NotificationSender,
    kind: NotificationKind,
    trip_id: &Id<Trip>,
    passenger_tokens: Vec<String>,
) {
    let messages = passenger_tokens
        .into_iter()
        .map(|token| Notification::new(kind, token).with("tripId", trip_id.to_string()))
        .collect::<Vec<_>>();
    for (notification, why) in notifications.send_all(messages).await {
        log::warn!(
            "could not send '{}' notification for trip '{}': {}",
            notification.kind,
            trip_id,
            why
        );
    }
}

async fn tracking_events(
    OriginalUri(original_uri): OriginalUri,
    State(trackers): State<Arc<TrackerRegistry>>,
    Path(trip_id): Path<String>,
) -> RouteResult<Sse<impl Stream<Item = Result<Event, axum::Error>>>> {
    let trip_id: Id<Trip> = Id::new(trip_id);
    let session = find_session(&trackers, &trip_id, &Method::GET, original_uri.path()).await?;

    // lagging subscribers skip what they missed
    let stream = BroadcastStream::new(session.tracker.subscribe())
        .filter_map(|event| event.ok())
        .map(|event| Event::default().event(event.name()).json_data(&event));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
