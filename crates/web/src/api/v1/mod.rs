use axum::{
    routing::{get, on},
    Router,
};
use model::{ride_request::RideRequest, user::User, WithId};

use crate::{
    common::{route_not_found, schema, METHOD_FILTER_ALL},
    WebState,
};

mod notifications;
mod polylines;
mod proximity;
mod route;
mod trips;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/users/schema", get(schema::<WithId<User>>))
        .route("/requests/schema", get(schema::<WithId<RideRequest>>))
        .nest_service("/polyline", polylines::routes(state.clone()))
        .nest_service("/proximity", proximity::routes(state.clone()))
        .nest_service("/route", route::routes(state.clone()))
        .nest_service("/notifications", notifications::routes(state.clone()))
        .nest_service("/trips", trips::routes(state.clone()))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}
