//! Client configuration.
//!
//! A [`ClientConfig`] can be built in code, loaded from a TOML file, and
//! then overridden from `OPTIONGREEK_*` environment variables.
//!
//! ```toml
//! api_url = "http://localhost:8000"
//! request_timeout_secs = 15
//! symbol = "NSE:NIFTYBANK-INDEX"
//!
//! [websocket]
//! max_reconnect_attempts = 8
//! initial_backoff_ms = 500
//!
//! [polling]
//! option_chain_table = 3
//! high_volume_scanner = 300
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::constants::{self, API_BASE_URL, NIFTY_50};
use crate::dashboard::panel::Panel;
use crate::error::{OptionGreekError, Result};
use crate::ws::client::WsConfig;

/// Environment variable overriding [`ClientConfig::api_base_url`].
pub const ENV_API_URL: &str = "OPTIONGREEK_API_URL";
/// Environment variable overriding [`ClientConfig::access_token`].
pub const ENV_ACCESS_TOKEN: &str = "OPTIONGREEK_ACCESS_TOKEN";
/// Environment variable overriding [`ClientConfig::default_symbol`].
pub const ENV_SYMBOL: &str = "OPTIONGREEK_SYMBOL";
/// Environment variable overriding [`WsSection::max_reconnect_attempts`].
pub const ENV_WS_MAX_RETRIES: &str = "OPTIONGREEK_WS_MAX_RETRIES";

/// WebSocket reconnect and heartbeat settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsSection {
    pub max_reconnect_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub heartbeat: Duration,
}

impl Default for WsSection {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: constants::websocket::MAX_RECONNECT_ATTEMPTS,
            initial_backoff: Duration::from_millis(constants::websocket::INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(constants::websocket::MAX_BACKOFF_MS),
            heartbeat: Duration::from_secs(constants::websocket::HEARTBEAT_SECS),
        }
    }
}

/// Top-level configuration for the OptionGreek client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without the `/api/v1` prefix.
    pub api_base_url: String,
    /// Optional bearer token sent on every REST request.
    pub access_token: Option<String>,
    pub request_timeout: Duration,
    /// Underlying used by symbol-scoped panels.
    pub default_symbol: String,
    pub ws: WsSection,
    /// Per-panel polling interval overrides.
    pub polling: BTreeMap<Panel, Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_owned(),
            access_token: None,
            request_timeout: Duration::from_secs(15),
            default_symbol: NIFTY_50.to_owned(),
            ws: WsSection::default(),
            polling: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            OptionGreekError::Config(format!(
                "failed to read config file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TomlConfig = toml::from_str(content)?;
        Self::try_from(file)
    }

    /// Apply `OPTIONGREEK_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api_base_url = url;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN).filter(|v| !v.is_empty()) {
            self.access_token = Some(token);
        }
        if let Some(symbol) = lookup(ENV_SYMBOL).filter(|v| !v.is_empty()) {
            self.default_symbol = symbol;
        }
        if let Some(raw) = lookup(ENV_WS_MAX_RETRIES) {
            self.ws.max_reconnect_attempts = raw.trim().parse().map_err(|_| {
                OptionGreekError::Config(format!("{ENV_WS_MAX_RETRIES} must be an integer, got {raw:?}"))
            })?;
        }
        Ok(())
    }

    /// Polling interval for `panel`, falling back to the panel's default.
    pub fn interval_for(&self, panel: Panel) -> Duration {
        self.polling
            .get(&panel)
            .copied()
            .unwrap_or_else(|| panel.default_interval())
    }

    /// WebSocket URL for `path`, derived from the API base URL
    /// (`http` becomes `ws`, `https` becomes `wss`). `path` is appended to
    /// any path prefix on the base URL, matching REST request URLs.
    pub fn ws_url(&self, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base_url)?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(OptionGreekError::Config(format!(
                    "unsupported API URL scheme {other:?}"
                )));
            }
        };
        url.set_scheme(scheme).map_err(|_| {
            OptionGreekError::Config(format!("cannot derive WebSocket URL from {}", self.api_base_url))
        })?;
        let joined = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(None);
        Ok(url)
    }

    /// [`WsConfig`] for the WebSocket route at `path`.
    pub fn ws_config(&self, path: &str) -> Result<WsConfig> {
        let url = self.ws_url(path)?;
        Ok(WsConfig::new(url.as_str())
            .max_reconnect_attempts(self.ws.max_reconnect_attempts)
            .initial_backoff(self.ws.initial_backoff)
            .max_backoff(self.ws.max_backoff)
            .heartbeat(self.ws.heartbeat))
    }
}

// ---------------------------------------------------------------------------
// TOML file representation
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    api_url: Option<String>,
    access_token: Option<String>,
    request_timeout_secs: Option<u64>,
    symbol: Option<String>,
    #[serde(default)]
    websocket: TomlWebSocket,
    #[serde(default)]
    polling: BTreeMap<String, u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlWebSocket {
    max_reconnect_attempts: Option<u32>,
    initial_backoff_ms: Option<u64>,
    max_backoff_ms: Option<u64>,
    heartbeat_secs: Option<u64>,
}

impl TryFrom<TomlConfig> for ClientConfig {
    type Error = OptionGreekError;

    fn try_from(file: TomlConfig) -> Result<Self> {
        let mut config = ClientConfig::default();
        if let Some(url) = file.api_url {
            config.api_base_url = url;
        }
        config.access_token = file.access_token;
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(symbol) = file.symbol {
            config.default_symbol = symbol;
        }

        let ws = file.websocket;
        if let Some(n) = ws.max_reconnect_attempts {
            config.ws.max_reconnect_attempts = n;
        }
        if let Some(ms) = ws.initial_backoff_ms {
            config.ws.initial_backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = ws.max_backoff_ms {
            config.ws.max_backoff = Duration::from_millis(ms);
        }
        if let Some(secs) = ws.heartbeat_secs {
            config.ws.heartbeat = Duration::from_secs(secs);
        }

        for (slug, secs) in file.polling {
            let panel: Panel = slug.parse()?;
            config.polling.insert(panel, Duration::from_secs(secs.max(1)));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::constants::{WS_ALERTS_PATH, WS_MARKET_PATH};

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.default_symbol, "NSE:NIFTY50-INDEX");
        assert_eq!(config.ws.max_reconnect_attempts, 5);
        assert!(config.access_token.is_none());
    }

    #[test]
    fn parses_full_toml() {
        let config = ClientConfig::from_toml_str(
            r#"
            api_url = "https://og.example.com"
            request_timeout_secs = 5
            symbol = "NSE:NIFTYBANK-INDEX"

            [websocket]
            max_reconnect_attempts = 8
            initial_backoff_ms = 250
            max_backoff_ms = 4000
            heartbeat_secs = 10

            [polling]
            option_chain_table = 3
            high_volume_scanner = 300
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://og.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.default_symbol, "NSE:NIFTYBANK-INDEX");
        assert_eq!(config.ws.max_reconnect_attempts, 8);
        assert_eq!(config.ws.initial_backoff, Duration::from_millis(250));
        assert_eq!(config.ws.max_backoff, Duration::from_millis(4000));
        assert_eq!(config.ws.heartbeat, Duration::from_secs(10));
        assert_eq!(
            config.interval_for(Panel::OptionChainTable),
            Duration::from_secs(3)
        );
        assert_eq!(
            config.interval_for(Panel::HighVolumeScanner),
            Duration::from_secs(300)
        );
        assert_eq!(
            config.interval_for(Panel::MarketIndices),
            Panel::MarketIndices.default_interval()
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = ClientConfig::from_toml_str("api_uri = \"http://x\"").unwrap_err();
        assert!(matches!(err, OptionGreekError::Config(_)));
    }

    #[test]
    fn rejects_unknown_panel() {
        let err = ClientConfig::from_toml_str("[polling]\nnews_feed = 10").unwrap_err();
        assert!(matches!(err, OptionGreekError::Config(_)));
    }

    #[test]
    fn env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "http://10.0.0.5:9000"),
            (ENV_ACCESS_TOKEN, "secret"),
            (ENV_SYMBOL, "NSE:RELIANCE-EQ"),
            (ENV_WS_MAX_RETRIES, " 3 "),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config
            .apply_vars(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_base_url, "http://10.0.0.5:9000");
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert_eq!(config.default_symbol, "NSE:RELIANCE-EQ");
        assert_eq!(config.ws.max_reconnect_attempts, 3);
    }

    #[test]
    fn bad_retry_env_is_an_error() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_vars(|k| (k == ENV_WS_MAX_RETRIES).then(|| "many".to_owned()))
            .unwrap_err();
        assert!(matches!(err, OptionGreekError::Config(_)));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = ClientConfig::default();
        config
            .apply_vars(|k| (k == ENV_API_URL).then(String::new))
            .unwrap();
        assert_eq!(config.api_base_url, API_BASE_URL);
    }

    #[test]
    fn ws_url_follows_api_scheme() {
        let mut config = ClientConfig::default();
        assert_eq!(
            config.ws_url(WS_MARKET_PATH).unwrap().as_str(),
            "ws://localhost:8000/api/v1/ws/market"
        );

        config.api_base_url = "https://og.example.com/".into();
        assert_eq!(
            config.ws_url(WS_MARKET_PATH).unwrap().as_str(),
            "wss://og.example.com/api/v1/ws/market"
        );

        config.api_base_url = "ftp://og.example.com".into();
        assert!(config.ws_url(WS_MARKET_PATH).is_err());
    }

    #[test]
    fn ws_url_keeps_base_path_prefix() {
        let config = ClientConfig {
            api_base_url: "https://gw.example.com/optiongreek".into(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.ws_url(WS_MARKET_PATH).unwrap().as_str(),
            "wss://gw.example.com/optiongreek/api/v1/ws/market"
        );

        let config = ClientConfig {
            api_base_url: "http://10.0.0.5:8080/og/?debug=1".into(),
            ..ClientConfig::default()
        };
        assert_eq!(
            config.ws_config(WS_ALERTS_PATH).unwrap().url,
            "ws://10.0.0.5:8080/og/api/v1/ws/alerts"
        );
    }
}
