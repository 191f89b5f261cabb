use std::env;

use async_trait::async_trait;
use itertools::Itertools;
use model::{route::Route, Coordinate};

use crate::{response::DirectionsResponse, ApiError};

pub const GOOGLE_DIRECTIONS_URL: &str =
    "https://maps.googleapis.com/maps/api/directions/json";

#[derive(Clone, Debug)]
pub struct DirectionsCredentials {
    pub api_key: String,
    /// Overrides `GOOGLE_DIRECTIONS_URL`, e.g. for a proxy.
    pub base_url: Option<String>,
}

impl DirectionsCredentials {
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("GOOGLE_MAPS_API_KEY").ok()?;
        let base_url = env::var("DIRECTIONS_BASE_URL").ok();
        Some(Self { api_key, base_url })
    }

    fn url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(GOOGLE_DIRECTIONS_URL)
    }
}

/// Driving directions between two points, optionally via waypoints.
#[async_trait]
pub trait Directions: Send + Sync {
    async fn route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<Route, ApiError>;
}

pub struct DirectionsClient {
    pub credentials: DirectionsCredentials,
    client: reqwest::Client,
}

impl DirectionsClient {
    pub fn new(credentials: &DirectionsCredentials) -> Self {
        Self {
            credentials: credentials.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the raw directions response.
    pub async fn get(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<DirectionsResponse, ApiError> {
        let mut query = vec![
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("mode", "driving".to_owned()),
        ];
        if !waypoints.is_empty() {
            query.push(("waypoints", waypoints.iter().join("|")));
        }

        let url = self.credentials.url();
        log::info!("Requesting directions from {origin} to {destination}.");

        /* perform get-request */
        let response = self
            .client
            .get(url)
            .query(&query)
            .query(&[("key", &self.credentials.api_key)])
            .send()
            .await?;

        /* parse response */
        match response.status() {
            reqwest::StatusCode::OK => Ok(serde_json::from_str(&response.text().await?)?),
            other => Err(ApiError::InvalidResponse {
                status_code: other,
                url: url.to_owned(),
                response: response.text().await.ok(),
            }),
        }
    }
}

#[async_trait]
impl Directions for DirectionsClient {
    async fn route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        waypoints: &[Coordinate],
    ) -> Result<Route, ApiError> {
        self.get(origin, destination, waypoints)
            .await?
            .into_route()
    }
}
