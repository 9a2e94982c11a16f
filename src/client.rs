//! Core HTTP client for the OptionGreek REST API.
//!
//! The [`OptionGreekClient`] struct is the main entry point for fetching
//! dashboard data. It wraps [`reqwest::Client`] with default headers, an
//! optional bearer token and a request timeout, and provides typed `get`,
//! `get_query` and `post` methods.
//!
//! API endpoint methods are added to `OptionGreekClient` via `impl` blocks in
//! the [`crate::api`] module.

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::constants::{API_BASE_URL, API_PREFIX};
use crate::error::{ApiErrorBody, OptionGreekError, Result};

/// Response bodies that can report a failure inside a `200 OK`.
///
/// Several backend routes degrade gracefully by answering
/// `{"success": false, "error": "..."}` (or just `{"error": "..."}`) instead of
/// an HTTP error status. Implementors expose that signal so the `*_checked`
/// helpers can turn it into [`OptionGreekError::Backend`].
pub trait BackendStatus {
    /// The backend-reported failure message, if any.
    fn backend_error(&self) -> Option<String>;
}

/// Core HTTP client for the OptionGreek REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use optiongreek::client::OptionGreekClient;
///
/// # #[tokio::main]
/// # async fn main() -> optiongreek::error::Result<()> {
/// let client = OptionGreekClient::with_base_url("http://localhost:8000")?;
/// let health = client.health().await?;
/// println!("{}", health.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OptionGreekClient {
    http: reqwest::Client,
    /// Base URL for REST API requests (defaults to [`API_BASE_URL`]).
    base_url: String,
    /// Pre-built `Authorization` header, if a token was configured.
    auth_header: Option<HeaderValue>,
}

impl OptionGreekClient {
    /// Create a client for the default local backend (`http://localhost:8000`).
    pub fn new() -> Result<Self> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Create a client pointing at a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(&ClientConfig {
            api_base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    /// Create a client from a [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let base_url = config.api_base_url.trim_end_matches('/').to_owned();
        url::Url::parse(&base_url)?;

        let http = reqwest::Client::builder()
            .default_headers(Self::default_headers())
            .timeout(config.request_timeout)
            .build()?;

        let auth_header = config
            .access_token
            .as_deref()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    OptionGreekError::InvalidArgument(
                        "access token contains invalid header characters".into(),
                    )
                })
            })
            .transpose()?;

        Ok(Self {
            http,
            base_url,
            auth_header,
        })
    }

    /// Returns a reference to the underlying `reqwest::Client`.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Generic HTTP helpers
    // -----------------------------------------------------------------------

    /// Perform a GET request and deserialize the JSON response.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let resp = self.authorize(self.http.get(&url)).send().await?;
        self.handle_response(resp).await
    }

    /// Perform a GET request with query parameters and deserialize the
    /// JSON response.
    pub async fn get_query<Q: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<R> {
        let url = self.url(path);
        tracing::debug!(%url, "GET (query)");

        let resp = self
            .authorize(self.http.get(&url).query(query))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Perform a POST request with a JSON body and deserialize the response.
    pub async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");

        let resp = self
            .authorize(self.http.post(&url).json(body))
            .send()
            .await?;
        self.handle_response(resp).await
    }

    /// Perform a POST request without a body and deserialize the response.
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let url = self.url(path);
        tracing::debug!(%url, "POST (empty)");

        let resp = self.authorize(self.http.post(&url)).send().await?;
        self.handle_response(resp).await
    }

    /// [`get`](Self::get), then surface a backend-reported failure as
    /// [`OptionGreekError::Backend`].
    pub async fn get_checked<R: DeserializeOwned + BackendStatus>(&self, path: &str) -> Result<R> {
        check_backend(self.get(path).await?)
    }

    /// [`get_query`](Self::get_query) with backend failure checking.
    pub async fn get_query_checked<Q, R>(&self, path: &str, query: &Q) -> Result<R>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned + BackendStatus,
    {
        check_backend(self.get_query(path, query).await?)
    }

    /// [`post`](Self::post) with backend failure checking.
    pub async fn post_checked<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned + BackendStatus,
    {
        check_backend(self.post(path, body).await?)
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    /// Build the full URL from a path relative to the API prefix.
    pub(crate) fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}{}", self.base_url, API_PREFIX, path)
        } else {
            format!("{}{}/{}", self.base_url, API_PREFIX, path)
        }
    }

    /// Default headers applied to every request.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_header {
            Some(value) => req.header(header::AUTHORIZATION, value.clone()),
            None => req,
        }
    }

    /// Read a response, returning either the deserialized body or an
    /// [`OptionGreekError`].
    async fn handle_response<R: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<R> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            serde_json::from_slice(&bytes).map_err(OptionGreekError::Json)
        } else {
            let body = String::from_utf8_lossy(&bytes);
            tracing::debug!(%status, "request failed");
            Err(parse_error_body(status, &body))
        }
    }
}

/// Try to parse FastAPI's `{"detail": ...}` error structure; fall back to a
/// raw HTTP status error.
pub(crate) fn parse_error_body(status: reqwest::StatusCode, body: &str) -> OptionGreekError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(api_err) => OptionGreekError::Api {
            status,
            body: api_err,
        },
        Err(_) => OptionGreekError::HttpStatus {
            status,
            body: body.to_owned(),
        },
    }
}

fn check_backend<R: BackendStatus>(resp: R) -> Result<R> {
    match resp.backend_error() {
        Some(msg) => Err(OptionGreekError::Backend(msg)),
        None => Ok(resp),
    }
}

/// Percent-encode a symbol such as `NSE:NIFTY50-INDEX` for use as a single
/// path segment.
pub(crate) fn path_segment(symbol: &str) -> String {
    url::form_urlencoded::byte_serialize(symbol.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
