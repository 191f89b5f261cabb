use axum::{
    extract::{Query, State},
    routing::{get, on},
    Json, Router,
};
use model::{route::Route, Coordinate};
use serde::Deserialize;

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, METHOD_FILTER_ALL},
    RouteResult, WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(route))
        .route("/schema", get(schema::<Route>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouteQuery {
    origin_latitude: f64,
    origin_longitude: f64,
    destination_latitude: f64,
    destination_longitude: f64,
    /// `lat,lng|lat,lng|...`
    waypoints: Option<String>,
}

fn parse_waypoints(waypoints: &str) -> RouteResult<Vec<Coordinate>> {
    waypoints
        .split('|')
        .filter(|waypoint| !waypoint.trim().is_empty())
        .map(|waypoint| {
            let invalid =
                || RouteErrorResponse::bad_request(format!("Invalid waypoint '{}'.", waypoint));
            let (latitude, longitude) = waypoint.split_once(',').ok_or_else(invalid)?;
            let latitude = latitude.trim().parse().map_err(|_| invalid())?;
            let longitude = longitude.trim().parse().map_err(|_| invalid())?;
            Ok(Coordinate::new(latitude, longitude)?)
        })
        .collect()
}

async fn route(
    State(WebState { directions, .. }): State<WebState>,
    Query(params): Query<RouteQuery>,
) -> RouteResult<Json<Route>> {
    let directions =
        directions.ok_or_else(|| RouteErrorResponse::service_unavailable("directions"))?;

    let origin = Coordinate::new(params.origin_latitude, params.origin_longitude)?;
    let destination =
        Coordinate::new(params.destination_latitude, params.destination_longitude)?;
    let waypoints = match params.waypoints {
        Some(waypoints) => parse_waypoints(&waypoints)?,
        None => vec![],
    };

    let route = directions.route(&origin, &destination, &waypoints).await?;
    Ok(Json(route))
}
