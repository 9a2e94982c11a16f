//! Error types for the `optiongreek` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, OptionGreekError>`.
//!
//! [`OptionGreekError`] covers:
//! - **API errors**: FastAPI `{"detail": ...}` error bodies
//! - **HTTP status errors**: Unexpected status codes with response body
//! - **Backend errors**: `200 OK` bodies reporting `success: false`
//! - **HTTP transport errors**: Network, TLS, timeout failures
//! - **JSON errors**: Deserialization failures
//! - **WebSocket errors**: Connection, protocol and reconnect exhaustion
//! - **Configuration errors**: TOML and environment parsing
//! - **Invalid arguments**: Client-side validation errors

use std::fmt;

/// Error body returned by the OptionGreek API on non-2xx responses.
///
/// `detail` is a plain string for `HTTPException`s and a list of objects for
/// request validation failures (HTTP 422).
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorBody {
    pub detail: serde_json::Value,
}

impl ApiErrorBody {
    /// Human-readable message extracted from `detail`.
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.get("msg")
                        .and_then(|m| m.as_str())
                        .map(str::to_owned)
                        .unwrap_or_else(|| item.to_string())
                })
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// All possible errors produced by the OptionGreek client.
#[derive(Debug, thiserror::Error)]
pub enum OptionGreekError {
    /// An error response returned by the OptionGreek REST API.
    #[error("API error ({status}): {body}")]
    Api {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The parsed error body.
        body: ApiErrorBody,
    },

    /// The server returned an unexpected HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// The backend answered `200 OK` but reported a failure in the body.
    #[error("backend error: {0}")]
    Backend(String),

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to serialize or deserialize JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A WebSocket-level error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The WebSocket client gave up after the configured number of attempts.
    #[error("WebSocket reconnect failed after {attempts} attempts")]
    ReconnectExhausted {
        /// Reconnect attempts made.
        attempts: u32,
    },

    /// A background task or its channel has gone away.
    #[error("channel closed")]
    ChannelClosed,

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid configuration file or environment value.
    #[error("config error: {0}")]
    Config(String),

    /// The caller provided an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<toml::de::Error> for OptionGreekError {
    fn from(e: toml::de::Error) -> Self {
        Self::Config(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OptionGreekError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_string_message() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"detail":"Failed to fetch option chain"}"#).unwrap();
        assert_eq!(body.message(), "Failed to fetch option chain");
    }

    #[test]
    fn detail_validation_list_message() {
        let body: ApiErrorBody = serde_json::from_str(
            r#"{"detail":[{"loc":["query","limit"],"msg":"ensure this value is less than or equal to 50","type":"value_error"}]}"#,
        )
        .unwrap();
        assert_eq!(
            body.message(),
            "ensure this value is less than or equal to 50"
        );
    }

    #[test]
    fn reconnect_exhausted_display() {
        let err = OptionGreekError::ReconnectExhausted { attempts: 5 };
        assert_eq!(err.to_string(), "WebSocket reconnect failed after 5 attempts");
    }
}
