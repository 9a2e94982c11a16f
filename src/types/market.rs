//! Market data types: spot price, index quotes, OHLCV history.

use serde::{Deserialize, Serialize};

use super::{Resolution, success_flag_error};
use crate::client::BackendStatus;

// ---------------------------------------------------------------------------
// Spot price
// ---------------------------------------------------------------------------

/// Response from `GET /market/spot/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpotPrice {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub ltp: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    /// Previous close.
    #[serde(default)]
    pub close: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub volume: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl BackendStatus for SpotPrice {
    fn backend_error(&self) -> Option<String> {
        success_flag_error(self.success, self.error.as_deref(), "spot price")
    }
}

// ---------------------------------------------------------------------------
// Indices
// ---------------------------------------------------------------------------

/// Quote values of a single instrument as relayed from the broker.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuoteValues {
    /// Last traded price.
    #[serde(default)]
    pub lp: Option<f64>,
    /// Absolute change.
    #[serde(default)]
    pub ch: Option<f64>,
    /// Percent change.
    #[serde(default)]
    pub chp: Option<f64>,
    #[serde(default)]
    pub open_price: Option<f64>,
    #[serde(default)]
    pub high_price: Option<f64>,
    #[serde(default)]
    pub low_price: Option<f64>,
    #[serde(default)]
    pub prev_close_price: Option<f64>,
    #[serde(default)]
    pub volume: Option<i64>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One index quote.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IndexQuote {
    /// Symbol (e.g. `"NSE:NIFTY50-INDEX"`).
    #[serde(rename = "n")]
    pub symbol: String,
    /// Per-symbol status (`"ok"` or an error marker).
    #[serde(rename = "s", default)]
    pub status: Option<String>,
    #[serde(rename = "v", default)]
    pub values: QuoteValues,
}

impl IndexQuote {
    /// Short display name: the broker's short name, or the symbol without
    /// its exchange prefix and `-INDEX` suffix.
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.values.short_name.as_deref().filter(|n| !n.is_empty()) {
            return name;
        }
        let bare = self
            .symbol
            .split_once(':')
            .map_or(self.symbol.as_str(), |(_, rest)| rest);
        bare.strip_suffix("-INDEX").unwrap_or(bare)
    }

    /// Whether the index is up on the day. `None` if change is unknown.
    pub fn is_up(&self) -> Option<bool> {
        self.values.ch.map(|ch| ch >= 0.0)
    }
}

/// Response from `GET /market/indices`.
///
/// The backend degrades to `{"success": false, "data": [], "error": ...}`
/// with `200 OK` when the broker is unreachable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IndicesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<IndexQuote>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl BackendStatus for IndicesResponse {
    fn backend_error(&self) -> Option<String> {
        success_flag_error(self.success, self.error.as_deref(), "indices")
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Query parameters for `GET /market/history/{symbol}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryQuery {
    pub resolution: Resolution,
    /// Days back from today.
    pub days: u32,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            resolution: Resolution::Day,
            days: 30,
        }
    }
}

/// One OHLCV candle.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Candle {
    /// Epoch seconds.
    pub timestamp: i64,
    #[serde(default)]
    pub datetime: Option<String>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Response from `GET /market/history/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub candles: Vec<Candle>,
    #[serde(default)]
    pub count: usize,
}

impl BackendStatus for HistoryResponse {
    fn backend_error(&self) -> Option<String> {
        success_flag_error(self.success, self.error.as_deref(), "history")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_quote_display_name() {
        let quotes: IndicesResponse = serde_json::from_str(
            r#"{"success": true, "data": [
                {"n": "NSE:NIFTY50-INDEX", "s": "ok", "v": {"lp": 24010.5, "ch": -12.3, "chp": -0.05, "short_name": "NIFTY50"}},
                {"n": "BSE:SENSEX-INDEX", "s": "ok", "v": {"lp": 79100.0, "ch": 40.0}}
            ], "timestamp": "2024-12-20T11:00:00"}"#,
        )
        .unwrap();

        assert_eq!(quotes.data[0].display_name(), "NIFTY50");
        assert_eq!(quotes.data[0].is_up(), Some(false));
        assert_eq!(quotes.data[1].display_name(), "SENSEX");
        assert_eq!(quotes.data[1].is_up(), Some(true));
        assert!(quotes.backend_error().is_none());
    }

    #[test]
    fn degraded_indices_is_backend_error() {
        let quotes: IndicesResponse =
            serde_json::from_str(r#"{"success": false, "data": [], "error": null}"#).unwrap();
        assert_eq!(quotes.backend_error().as_deref(), Some("indices failed"));
    }

    #[test]
    fn history_query_serializes() {
        let q = HistoryQuery {
            resolution: Resolution::Min5,
            days: 2,
        };
        assert_eq!(
            serde_json::to_value(q).unwrap(),
            serde_json::json!({"resolution": "5", "days": 2})
        );
    }
}
