use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, on, post},
    Json, Router,
};
use model::notification::Notification;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, METHOD_FILTER_ALL},
    RouteResult, WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", post(send_notification))
        .route("/schema", get(schema::<Notification>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn send_notification(
    State(WebState { notifications, .. }): State<WebState>,
    Json(notification): Json<Notification>,
) -> RouteResult<StatusCode> {
    let notifications = notifications
        .ok_or_else(|| RouteErrorResponse::service_unavailable("notification"))?;
    notifications.send(&notification).await?;
    Ok(StatusCode::NO_CONTENT)
}
