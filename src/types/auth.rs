//! Authentication status and broker login flows.

use serde::{Deserialize, Serialize};

/// Response from `GET /auth/status`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AuthStatus {
    /// A token is present and validated against the broker.
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub has_token: bool,
    #[serde(default)]
    pub is_valid: bool,
    /// Broker profile, present only when authenticated.
    #[serde(default)]
    pub user_info: Option<serde_json::Value>,
    /// Truncated app id (e.g. `"ABCD1234-1..."`).
    #[serde(default)]
    pub app_id: Option<String>,
}

impl AuthStatus {
    /// Account name from the broker profile, if any.
    pub fn user_name(&self) -> Option<&str> {
        self.user_info.as_ref()?.get("name")?.as_str()
    }
}

/// Response from `GET /auth/login`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginUrl {
    pub login_url: String,
}

/// Response from `POST /auth/refresh`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenValidation {
    pub is_valid: bool,
    #[serde(default)]
    pub message: String,
}

/// Generic `{status, message}` acknowledgement.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusMessage {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub info: Option<String>,
}

impl StatusMessage {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Body of `POST /auth/token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthCodeRequest<'a> {
    pub auth_code: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_status() {
        let s: AuthStatus = serde_json::from_str(
            r#"{"authenticated": true, "has_token": true, "is_valid": true,
                "user_info": {"name": "A TRADER", "fy_id": "XA00001"}, "app_id": "ABCD1234-1..."}"#,
        )
        .unwrap();
        assert_eq!(s.user_name(), Some("A TRADER"));
    }

    #[test]
    fn unauthenticated_status() {
        let s: AuthStatus = serde_json::from_str(
            r#"{"authenticated": false, "has_token": false, "is_valid": false, "user_info": null, "app_id": null}"#,
        )
        .unwrap();
        assert!(!s.authenticated);
        assert_eq!(s.user_name(), None);
    }

    #[test]
    fn status_message() {
        let m: StatusMessage = serde_json::from_str(
            r#"{"status": "success", "message": "Token generated", "info": "Access token saved to .env file"}"#,
        )
        .unwrap();
        assert!(m.is_success());
    }
}
