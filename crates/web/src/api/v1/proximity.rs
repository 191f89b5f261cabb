use axum::{
    extract::{Query, State},
    routing::{get, on},
    Json, Router,
};
use model::{Coordinate, ProximityThreshold};
use serde::Deserialize;
use tracking::{Proximity, ProximityMonitor};

use crate::{
    common::{route_not_found, RouteErrorResponse, METHOD_FILTER_ALL},
    RouteResult, WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(proximity))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProximityQuery {
    current_latitude: f64,
    current_longitude: f64,
    destination_latitude: f64,
    destination_longitude: f64,
    threshold_meters: Option<f64>,
}

async fn proximity(
    State(default_threshold): State<ProximityThreshold>,
    Query(params): Query<ProximityQuery>,
) -> RouteResult<Json<Proximity>> {
    let current = Coordinate::new(params.current_latitude, params.current_longitude)?;
    let destination =
        Coordinate::new(params.destination_latitude, params.destination_longitude)?;
    let threshold = match params.threshold_meters {
        Some(meters) => ProximityThreshold::new(meters)
            .map_err(|why| RouteErrorResponse::bad_request(why.to_string()))?,
        None => default_threshold,
    };

    Ok(Json(ProximityMonitor::new(destination, threshold).check(&current)))
}
