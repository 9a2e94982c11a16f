//! Constants for the OptionGreek API.
//!
//! Contains base URLs, WebSocket paths, request limits mirrored from the
//! backend, and the default polling cadence of every dashboard panel.

// ---------------------------------------------------------------------------
// Base URLs
// ---------------------------------------------------------------------------

/// Default base URL of a locally running OptionGreek backend.
pub const API_BASE_URL: &str = "http://localhost:8000";

/// Path prefix every REST and WebSocket route is mounted under.
pub const API_PREFIX: &str = "/api/v1";

// ---------------------------------------------------------------------------
// WebSocket paths
// ---------------------------------------------------------------------------

/// WebSocket path for live market updates (JSON).
pub const WS_MARKET_PATH: &str = "/api/v1/ws/market";

/// WebSocket path for order/trade alerts (JSON).
pub const WS_ALERTS_PATH: &str = "/api/v1/ws/alerts";

// ---------------------------------------------------------------------------
// Symbols
// ---------------------------------------------------------------------------

/// NIFTY 50 index, the default underlying for most panels.
pub const NIFTY_50: &str = "NSE:NIFTY50-INDEX";

/// NIFTY BANK index.
pub const NIFTY_BANK: &str = "NSE:NIFTYBANK-INDEX";

// ---------------------------------------------------------------------------
// Request limits
// ---------------------------------------------------------------------------

/// Request constraints enforced by the backend, checked client-side before
/// a request is sent.
pub mod limits {
    /// Maximum symbols per bulk option-chain analysis request.
    pub const MAX_BULK_SYMBOLS: usize = 20;
    /// Maximum tool calls per MCP batch request.
    pub const MAX_MCP_BATCH: usize = 10;
    /// Allowed range of the stock scan `limit` parameter.
    pub const STOCK_SCAN_LIMIT: std::ops::RangeInclusive<u32> = 1..=50;
    /// Allowed range of the high-volume scan `top_count` parameter.
    pub const HIGH_VOLUME_TOP: std::ops::RangeInclusive<u32> = 1..=20;
    /// Allowed range of the Greeks heatmap `strike_count` parameter.
    pub const HEATMAP_STRIKES: std::ops::RangeInclusive<u32> = 5..=30;
    /// Default strikes above/below ATM for the option chain table.
    pub const DEFAULT_STRIKE_COUNT: u32 = 10;
    /// Default strikes for the Greeks heatmap.
    pub const DEFAULT_HEATMAP_STRIKES: u32 = 15;
}

// ---------------------------------------------------------------------------
// Polling intervals
// ---------------------------------------------------------------------------

/// Default refresh cadence of each polled dashboard panel, in seconds.
pub mod polling {
    pub const MARKET_INDICES_SECS: u64 = 5;
    pub const OPTION_CHAIN_SECS: u64 = 5;
    pub const MARKET_STATE_SECS: u64 = 30;
    pub const ACTIVE_STRATEGY_SECS: u64 = 30;
    pub const STOCK_ANALYSIS_SECS: u64 = 60;
    pub const QUANT_DASHBOARD_SECS: u64 = 30;
    pub const GREEKS_HEATMAP_SECS: u64 = 15;
    pub const LIVE_TRADE_SIGNAL_SECS: u64 = 15;
    pub const HIGH_VOLUME_SECS: u64 = 120;
    pub const VAT_SCANNER_SECS: u64 = 30;
    pub const MCP_STATUS_SECS: u64 = 30;
}

// ---------------------------------------------------------------------------
// WebSocket defaults
// ---------------------------------------------------------------------------

/// Reconnect and heartbeat defaults for [`WsClient`](crate::ws::client::WsClient).
pub mod websocket {
    /// Reconnect attempts before the client gives up.
    pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
    /// Delay before the first reconnect attempt (milliseconds).
    pub const INITIAL_BACKOFF_MS: u64 = 1_000;
    /// Upper bound on the reconnect delay (milliseconds).
    pub const MAX_BACKOFF_MS: u64 = 30_000;
    /// Interval between application-level `ping` actions (seconds).
    pub const HEARTBEAT_SECS: u64 = 30;
    /// Buffered server messages before the reader applies backpressure.
    pub const CHANNEL_CAPACITY: usize = 1_024;
}
