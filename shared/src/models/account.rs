//! Account role and session models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role requested for a new account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Owner,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Owner => write!(f, "OWNER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

/// How an owner attaches a restaurant to the new account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationType {
    /// Claim a restaurant already known to the platform
    #[default]
    Existing,
    /// Register a restaurant that is not listed yet
    New,
}

/// Where the frontend navigates after signing up or in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Redirect {
    OwnerDashboard,
    Home,
}

impl Redirect {
    /// Owners land on their dashboard, everybody else on the home view
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Owner => Redirect::OwnerDashboard,
            Role::User | Role::Admin => Redirect::Home,
        }
    }
}

/// Session payload returned by the account service after signup or login
///
/// Only the fields the client acts on are typed. Everything else the service
/// returns is kept in `extra` and handed on to the session store untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        alias = "accessToken",
        alias = "sessionToken",
        skip_serializing_if = "Option::is_none"
    )]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthSession {
    pub fn redirect(&self) -> Redirect {
        Redirect::for_role(self.role)
    }
}

/// Login request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"OWNER\"");
        let role: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, Role::Admin);
    }

    #[test]
    fn test_redirect_for_role() {
        assert_eq!(Redirect::for_role(Role::Owner), Redirect::OwnerDashboard);
        assert_eq!(Redirect::for_role(Role::User), Redirect::Home);
        assert_eq!(Redirect::for_role(Role::Admin), Redirect::Home);
    }

    #[test]
    fn test_session_keeps_unknown_fields() {
        let session: AuthSession = serde_json::from_str(
            r#"{"userId":7,"username":"ab12","role":"OWNER","accessToken":"t0k","ownerStatus":"PENDING"}"#,
        )
        .unwrap();

        assert_eq!(session.user_id, Some(7));
        assert_eq!(session.token.as_deref(), Some("t0k"));
        assert_eq!(session.extra.get("ownerStatus"), Some(&Value::from("PENDING")));
        assert_eq!(session.redirect(), Redirect::OwnerDashboard);
    }
}
