use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::ExampleData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Driver,
    Passenger,
}

impl Role {
    pub fn other(&self) -> Role {
        match self {
            Role::Driver => Role::Passenger,
            Role::Passenger => Role::Driver,
        }
    }
}

/// A student profile. The push token is refreshed by the app whenever the
/// messaging service rotates it; users without one can not be notified.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub push_token: Option<String>,
}

impl HasId for User {
    type IdType = String;
}

impl User {
    pub fn switch_role(self) -> Self {
        Self {
            role: self.role.other(),
            ..self
        }
    }

    pub fn is_driver(&self) -> bool {
        self.role == Role::Driver
    }
}

impl ExampleData for User {
    fn example_data() -> Self {
        Self {
            name: "Jana".to_owned(),
            email: "jana@stu.uni-kiel.de".to_owned(),
            role: Role::Driver,
            push_token: Some("fcm-token-of-driver".to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_twice_restores_role() {
        let user = User::example_data();
        let switched = user.clone().switch_role();
        assert!(!switched.is_driver());
        assert_eq!(switched.switch_role(), user);
    }

    #[test]
    fn missing_push_token_is_omitted() {
        let user = User {
            push_token: None,
            ..User::example_data()
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("pushToken").is_none());
        assert_eq!(json["role"], "DRIVER");
    }
}
