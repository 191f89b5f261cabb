//! Push notification dispatch.
//!
//! Notifications are handed to an HTTP cloud function which forwards them to
//! the messaging service. Delivery, retries and ordering are up to that
//! service; a successful `send` only means the function accepted the message.

use std::{error, fmt, sync::Arc};

use async_trait::async_trait;
use model::notification::Notification;

pub mod dispatcher;

pub use dispatcher::{PushDispatcher, PushDispatcherConfig};

#[derive(Debug, Clone)]
pub enum DispatchError {
    RequestError(Arc<reqwest::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    MissingToken,
}

impl error::Error for DispatchError {}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DispatchError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            DispatchError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
            DispatchError::MissingToken => write!(f, "Notification has no push token."),
        }
    }
}

impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self {
        DispatchError::RequestError(Arc::new(e))
    }
}

#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), DispatchError>;

    /// Sends all notifications concurrently and returns the failed ones
    /// together with their error.
    async fn send_all(
        &self,
        notifications: Vec<Notification>,
    ) -> Vec<(Notification, DispatchError)> {
        let results = futures::future::join_all(
            notifications
                .iter()
                .map(|notification| self.send(notification)),
        )
        .await;

        notifications
            .into_iter()
            .zip(results)
            .filter_map(|(notification, result)| {
                result.err().map(|why| (notification, why))
            })
            .collect()
    }
}
