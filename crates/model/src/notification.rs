use std::{collections::BTreeMap, error, fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

/// The kinds of push notifications the app sends. The kebab-case tag is what
/// the dispatch endpoint receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    NewRequest,
    RequestAccepted,
    RequestRejected,
    NewMessage,
    TripStarted,
    TripFinished,
    TripCancelled,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 7] = [
        NotificationKind::NewRequest,
        NotificationKind::RequestAccepted,
        NotificationKind::RequestRejected,
        NotificationKind::NewMessage,
        NotificationKind::TripStarted,
        NotificationKind::TripFinished,
        NotificationKind::TripCancelled,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            NotificationKind::NewRequest => "new-request",
            NotificationKind::RequestAccepted => "request-accepted",
            NotificationKind::RequestRejected => "request-rejected",
            NotificationKind::NewMessage => "new-message",
            NotificationKind::TripStarted => "trip-started",
            NotificationKind::TripFinished => "trip-finished",
            NotificationKind::TripCancelled => "trip-cancelled",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNotificationKind(pub String);

impl error::Error for UnknownNotificationKind {}

impl fmt::Display for UnknownNotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown notification type '{}'", self.0)
    }
}

impl FromStr for NotificationKind {
    type Err = UnknownNotificationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| UnknownNotificationKind(s.to_owned()))
    }
}

/// A push notification addressed to a single device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// push token of the receiving app installation
    pub token: String,
    #[serde(default)]
    pub payload: BTreeMap<String, String>,
}

impl Notification {
    pub fn new(kind: NotificationKind, token: impl Into<String>) -> Self {
        Self {
            kind,
            token: token.into(),
            payload: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }
}

impl ExampleData for Notification {
    fn example_data() -> Self {
        Notification::new(NotificationKind::RequestAccepted, "fcm-token-of-passenger")
            .with("tripId", "4f1c2a9e")
            .with("senderName", "Jana")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_serde_names() {
        for kind in NotificationKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.tag()));
            assert_eq!(kind.tag().parse::<NotificationKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(
            "trip-paused".parse::<NotificationKind>(),
            Err(UnknownNotificationKind("trip-paused".to_owned()))
        );
    }

    #[test]
    fn wire_format() {
        let notification = Notification::new(NotificationKind::TripStarted, "abc")
            .with("tripId", "t-1");
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "trip-started",
                "token": "abc",
                "payload": { "tripId": "t-1" }
            })
        );

        let without_payload: Notification =
            serde_json::from_str(r#"{"type": "new-message", "token": "abc"}"#).unwrap();
        assert!(without_payload.payload.is_empty());
    }
}
