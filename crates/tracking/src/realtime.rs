use std::{env, error, fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use model::{location::LiveLocation, trip::Trip};
use reqwest::Url;
use utility::id::Id;

/// Upper bound for a single location write.
pub const PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub enum ChannelError {
    RequestError(Arc<reqwest::Error>),
    InvalidUrl(String),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
}

impl error::Error for ChannelError {}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChannelError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ChannelError::InvalidUrl(url) => write!(f, "Invalid channel url: {}", url),
            ChannelError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
        }
    }
}

impl From<reqwest::Error> for ChannelError {
    fn from(e: reqwest::Error) -> Self {
        ChannelError::RequestError(Arc::new(e))
    }
}

/// Somewhere live driver positions are pushed to while a trip is active.
#[async_trait]
pub trait LocationPublisher: Send + Sync {
    async fn publish(
        &self,
        trip_id: &Id<Trip>,
        location: &LiveLocation,
    ) -> Result<(), ChannelError>;
}

#[derive(Debug, Clone)]
pub struct RealtimeChannelConfig {
    /// root of the realtime database, e.g. `https://<project>.firebaseio.com`
    pub base_url: String,
    pub auth_token: Option<String>,
}

impl RealtimeChannelConfig {
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("REALTIME_DATABASE_URL").ok()?;
        let auth_token = env::var("REALTIME_DATABASE_TOKEN").ok();
        Some(Self {
            base_url,
            auth_token,
        })
    }
}

/// Key-value channel in a realtime database. The latest position of a trip is
/// stored under `locations/<trip id>`.
#[derive(Debug, Clone)]
pub struct RealtimeChannel {
    config: RealtimeChannelConfig,
    client: reqwest::Client,
}

impl RealtimeChannel {
    pub fn new(config: RealtimeChannelConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn location_url(&self, trip_id: &Id<Trip>) -> Result<Url, ChannelError> {
        let invalid = || ChannelError::InvalidUrl(self.config.base_url.clone());
        let mut url = Url::parse(&self.config.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push("locations")
            .push(&format!("{}.json", trip_id));
        if let Some(token) = &self.config.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }
}

#[async_trait]
impl LocationPublisher for RealtimeChannel {
    async fn publish(
        &self,
        trip_id: &Id<Trip>,
        location: &LiveLocation,
    ) -> Result<(), ChannelError> {
        let url = self.location_url(trip_id)?;
        log::debug!("Publishing location of trip '{trip_id}'.");

        let response = self
            .client
            .put(url.clone())
            .timeout(PUBLISH_TIMEOUT)
            .json(location)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            other => Err(ChannelError::InvalidResponse {
                status_code: other,
                url: url.to_string(),
                response: response.text().await.ok(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use model::Coordinate;
    use wiremock::{
        matchers::{body_json, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn location() -> LiveLocation {
        LiveLocation::new(
            Coordinate::new(54.3233, 10.1228).unwrap(),
            Utc.with_ymd_and_hms(2024, 10, 14, 7, 45, 0).unwrap(),
        )
    }

    fn channel(server: &MockServer, auth_token: Option<&str>) -> RealtimeChannel {
        RealtimeChannel::new(RealtimeChannelConfig {
            base_url: server.uri(),
            auth_token: auth_token.map(str::to_owned),
        })
    }

    #[tokio::test]
    async fn puts_location_under_trip_key() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/locations/t-1.json"))
            .and(query_param("auth", "secret"))
            .and(body_json(serde_json::json!({
                "latitude": 54.3233,
                "longitude": 10.1228,
                "recordedAt": "2024-10-14T07:45:00Z"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        channel(&server, Some("secret"))
            .publish(&Id::new("t-1".to_owned()), &location())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Permission denied"))
            .mount(&server)
            .await;

        let error = channel(&server, None)
            .publish(&Id::new("t-1".to_owned()), &location())
            .await
            .unwrap_err();
        match error {
            ChannelError::InvalidResponse {
                status_code,
                response,
                ..
            } => {
                assert_eq!(status_code, reqwest::StatusCode::UNAUTHORIZED);
                assert_eq!(response.as_deref(), Some("Permission denied"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_base_url() {
        let channel = RealtimeChannel::new(RealtimeChannelConfig {
            base_url: "not a url".to_owned(),
            auth_token: None,
        });
        assert!(matches!(
            channel.location_url(&Id::new("t".to_owned())),
            Err(ChannelError::InvalidUrl(_))
        ));
    }
}
