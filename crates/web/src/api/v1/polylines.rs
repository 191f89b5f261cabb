use axum::{
    extract::Query,
    routing::{get, on, post},
    Json, Router,
};
use model::{Coordinate, Polyline};
use serde::{Deserialize, Serialize};

use crate::{
    common::{route_not_found, METHOD_FILTER_ALL},
    RouteResult, WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/decode", get(decode))
        .route("/encode", post(encode))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Deserialize)]
struct DecodeQuery {
    encoded: String,
    precision: Option<u32>,
}

async fn decode(Query(params): Query<DecodeQuery>) -> RouteResult<Json<Polyline>> {
    let precision = params.precision.unwrap_or(polyline::PRECISION);
    let decoded = polyline::decode_with_precision(&params.encoded, precision)?;
    Ok(Json(decoded))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EncodeRequest {
    points: Vec<Coordinate>,
    precision: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodeResponse {
    encoded: String,
    length_meters: f64,
}

async fn encode(Json(request): Json<EncodeRequest>) -> RouteResult<Json<EncodeResponse>> {
    let precision = request.precision.unwrap_or(polyline::PRECISION);
    let encoded = polyline::encode_with_precision(&request.points, precision)?;
    let length_meters = Polyline::new(request.points).length_meters();
    Ok(Json(EncodeResponse {
        encoded,
        length_meters,
    }))
}
