//! Authentication endpoint implementations.
//!
//! The backend owns the broker session; these calls only inspect or drive
//! it. The OAuth redirect (`/auth/callback`) is handled by the backend and is
//! not exposed here.

use crate::client::OptionGreekClient;
use crate::error::{OptionGreekError, Result};
use crate::types::auth::{AuthCodeRequest, AuthStatus, LoginUrl, StatusMessage, TokenValidation};

impl OptionGreekClient {
    /// Broker login URL to open in a browser.
    ///
    /// **Endpoint:** `GET /api/v1/auth/login`
    pub async fn login_url(&self) -> Result<LoginUrl> {
        self.get("/auth/login").await
    }

    /// Current authentication state of the backend's broker session.
    ///
    /// **Endpoint:** `GET /api/v1/auth/status`
    pub async fn auth_status(&self) -> Result<AuthStatus> {
        self.get("/auth/status").await
    }

    /// Re-validate the stored access token.
    ///
    /// **Endpoint:** `POST /api/v1/auth/refresh`
    pub async fn refresh_token(&self) -> Result<TokenValidation> {
        self.post_empty("/auth/refresh").await
    }

    /// Ask the backend to reload its settings (picks up a new token).
    ///
    /// **Endpoint:** `POST /api/v1/auth/reload-settings`
    pub async fn reload_settings(&self) -> Result<StatusMessage> {
        self.post_empty("/auth/reload-settings").await
    }

    /// Trigger the backend's automated login flow.
    ///
    /// **Endpoint:** `POST /api/v1/auth/auto-login`
    pub async fn auto_login(&self) -> Result<StatusMessage> {
        self.post_empty("/auth/auto-login").await
    }

    /// Exchange a broker auth code for an access token, stored by the
    /// backend.
    ///
    /// **Endpoint:** `POST /api/v1/auth/token`
    ///
    /// # Errors
    ///
    /// [`OptionGreekError::InvalidArgument`] if `auth_code` is blank.
    pub async fn submit_auth_code(&self, auth_code: &str) -> Result<StatusMessage> {
        let auth_code = auth_code.trim();
        if auth_code.is_empty() {
            return Err(OptionGreekError::InvalidArgument(
                "auth code must not be empty".into(),
            ));
        }
        self.post("/auth/token", &AuthCodeRequest { auth_code })
            .await
    }
}
