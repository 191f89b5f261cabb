use std::env;

use async_trait::async_trait;
use model::notification::Notification;

use crate::{DispatchError, NotificationSender};

#[derive(Clone, Debug)]
pub struct PushDispatcherConfig {
    pub function_url: String,
    pub api_key: Option<String>,
}

impl PushDispatcherConfig {
    pub fn from_env() -> Option<Self> {
        let function_url = env::var("PUSH_FUNCTION_URL").ok()?;
        let api_key = env::var("PUSH_FUNCTION_KEY").ok();
        Some(Self {
            function_url,
            api_key,
        })
    }
}

/// Posts notifications as JSON to the dispatch function.
#[derive(Debug, Clone)]
pub struct PushDispatcher {
    config: PushDispatcherConfig,
    client: reqwest::Client,
}

impl PushDispatcher {
    pub fn new(config: PushDispatcherConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationSender for PushDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), DispatchError> {
        if notification.token.trim().is_empty() {
            return Err(DispatchError::MissingToken);
        }

        log::info!("Dispatching '{}' notification.", notification.kind);

        let mut request = self
            .client
            .post(&self.config.function_url)
            .json(notification);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            other => Err(DispatchError::InvalidResponse {
                status_code: other,
                url: self.config.function_url.clone(),
                response: response.text().await.ok(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use model::notification::NotificationKind;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn dispatcher(server: &MockServer, api_key: Option<&str>) -> PushDispatcher {
        PushDispatcher::new(PushDispatcherConfig {
            function_url: format!("{}/sendNotification", server.uri()),
            api_key: api_key.map(str::to_owned),
        })
    }

    #[tokio::test]
    async fn posts_tagged_notification() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendNotification"))
            .and(header("authorization", "Bearer fn-key"))
            .and(body_json(serde_json::json!({
                "type": "request-accepted",
                "token": "device-1",
                "payload": { "tripId": "t-1" }
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notification = Notification::new(NotificationKind::RequestAccepted, "device-1")
            .with("tripId", "t-1");
        dispatcher(&server, Some("fn-key"))
            .send(&notification)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_token_is_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = dispatcher(&server, None)
            .send(&Notification::new(NotificationKind::NewMessage, " "))
            .await;
        assert!(matches!(result, Err(DispatchError::MissingToken)));
    }

    #[tokio::test]
    async fn send_all_reports_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({
                "type": "trip-finished",
                "token": "stale",
                "payload": {}
            })))
            .respond_with(ResponseTemplate::new(404).set_body_string("unregistered"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let failed = dispatcher(&server, None)
            .send_all(vec![
                Notification::new(NotificationKind::TripFinished, "fresh"),
                Notification::new(NotificationKind::TripFinished, "stale"),
            ])
            .await;

        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].0.token, "stale");
        assert!(matches!(
            failed[0].1,
            DispatchError::InvalidResponse { status_code, .. }
                if status_code == reqwest::StatusCode::NOT_FOUND
        ));
    }
}
