//! JSON wire messages of the `/ws/market` and `/ws/alerts` channels.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Client → server
// ---------------------------------------------------------------------------

/// An action sent by the client.
///
/// ```
/// use optiongreek::ws::messages::ClientAction;
///
/// let json = serde_json::to_string(&ClientAction::subscribe(["NSE:SBIN-EQ"])).unwrap();
/// assert_eq!(json, r#"{"action":"subscribe","symbols":["NSE:SBIN-EQ"]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientAction {
    /// Subscribe to symbols. The alerts channel takes no symbols.
    Subscribe {
        #[serde(skip_serializing_if = "Option::is_none")]
        symbols: Option<Vec<String>>,
    },
    Unsubscribe {
        symbols: Vec<String>,
    },
    /// Application-level heartbeat, answered with `pong`.
    Ping,
}

impl ClientAction {
    pub fn subscribe<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Subscribe {
            symbols: Some(symbols.into_iter().map(Into::into).collect()),
        }
    }

    pub fn unsubscribe<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Unsubscribe {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Bare `{"action": "subscribe"}` used by the alerts channel.
    pub fn subscribe_alerts() -> Self {
        Self::Subscribe { symbols: None }
    }
}

// ---------------------------------------------------------------------------
// Server → client
// ---------------------------------------------------------------------------

/// A live quote relayed from the broker feed.
///
/// Only the common fields are typed; everything else the feed sends is kept
/// in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MarketTick {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub ltp: Option<f64>,
    /// Absolute change.
    #[serde(default)]
    pub ch: Option<f64>,
    /// Percent change.
    #[serde(default)]
    pub chp: Option<f64>,
    #[serde(default)]
    pub vol_traded_today: Option<f64>,
    #[serde(default)]
    pub open_price: Option<f64>,
    #[serde(default)]
    pub high_price: Option<f64>,
    #[serde(default)]
    pub low_price: Option<f64>,
    #[serde(default)]
    pub prev_close_price: Option<f64>,
    /// Epoch seconds.
    #[serde(default)]
    pub last_traded_time: Option<i64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A message received from the server.
///
/// Message types this client does not know are surfaced as
/// [`ServerMessage::Unknown`] instead of failing the stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    MarketUpdate {
        data: MarketTick,
    },
    /// Acknowledgement of a subscribe/unsubscribe. `status` is `"success"`
    /// or `"unsubscribed"` on the market channel and `"active"` on the
    /// alerts channel (which also sets `channel`).
    SubscriptionStatus {
        status: String,
        #[serde(default)]
        symbols: Vec<String>,
        #[serde(default)]
        channel: Option<String>,
    },
    Pong,
    /// Order or trade event, passed through as-is.
    Alert {
        data: serde_json::Value,
    },
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// Parse a text frame.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn as_tick(&self) -> Option<&MarketTick> {
        match self {
            Self::MarketUpdate { data } => Some(data),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_actions() {
        assert_eq!(
            serde_json::to_value(ClientAction::unsubscribe(["NSE:TCS-EQ"])).unwrap(),
            serde_json::json!({"action": "unsubscribe", "symbols": ["NSE:TCS-EQ"]})
        );
        assert_eq!(
            serde_json::to_string(&ClientAction::Ping).unwrap(),
            r#"{"action":"ping"}"#
        );
        assert_eq!(
            serde_json::to_string(&ClientAction::subscribe_alerts()).unwrap(),
            r#"{"action":"subscribe"}"#
        );
    }

    #[test]
    fn market_update() {
        let msg = ServerMessage::parse(
            r#"{"type": "market_update", "data": {"symbol": "NSE:NIFTY50-INDEX", "ltp": 24012.4,
                "ch": 18.1, "chp": 0.08, "type": "if", "exch_feed_time": 1734672000}}"#,
        )
        .unwrap();
        let tick = msg.as_tick().unwrap();
        assert_eq!(tick.symbol.as_deref(), Some("NSE:NIFTY50-INDEX"));
        assert_eq!(tick.ltp, Some(24012.4));
        assert_eq!(tick.extra["type"], "if");
    }

    #[test]
    fn status_pong_alert() {
        assert_eq!(
            ServerMessage::parse(r#"{"type": "subscription_status", "status": "success", "symbols": ["A"]}"#)
                .unwrap(),
            ServerMessage::SubscriptionStatus {
                status: "success".into(),
                symbols: vec!["A".into()],
                channel: None,
            }
        );
        assert_eq!(
            ServerMessage::parse(r#"{"type": "subscription_status", "channel": "alerts", "status": "active"}"#)
                .unwrap(),
            ServerMessage::SubscriptionStatus {
                status: "active".into(),
                symbols: vec![],
                channel: Some("alerts".into()),
            }
        );
        assert_eq!(ServerMessage::parse(r#"{"type": "pong"}"#).unwrap(), ServerMessage::Pong);
        let alert = ServerMessage::parse(r#"{"type": "alert", "data": {"orders": {"id": "1"}}}"#).unwrap();
        assert!(matches!(alert, ServerMessage::Alert { .. }));
    }

    #[test]
    fn unknown_type_is_not_an_error() {
        assert_eq!(
            ServerMessage::parse(r#"{"type": "welcome", "version": 2}"#).unwrap(),
            ServerMessage::Unknown
        );
        assert!(ServerMessage::parse("not json").is_err());
    }
}
