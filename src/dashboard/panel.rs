//! Dashboard panels, views and the parameters they share.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{NIFTY_50, limits, polling};
use crate::error::{OptionGreekError, Result};
use crate::types::scanner::{HighVolumeQuery, StockScanQuery};

// ---------------------------------------------------------------------------
// Panel
// ---------------------------------------------------------------------------

/// A dashboard panel. Every panel but [`Panel::RealTimeAlerts`] is polled
/// over REST; alerts stream over the WebSocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Panel {
    MarketIndices,
    OptionChainTable,
    MarketStateDetector,
    ActiveStrategy,
    RealTimeAlerts,
    StockAnalysis,
    QuantDashboard,
    GreeksHeatmap,
    LiveTradeSignal,
    HighVolumeScanner,
    VatScanner,
    McpTradingPanel,
}

impl Panel {
    pub const ALL: [Panel; 12] = [
        Panel::MarketIndices,
        Panel::OptionChainTable,
        Panel::MarketStateDetector,
        Panel::ActiveStrategy,
        Panel::RealTimeAlerts,
        Panel::StockAnalysis,
        Panel::QuantDashboard,
        Panel::GreeksHeatmap,
        Panel::LiveTradeSignal,
        Panel::HighVolumeScanner,
        Panel::VatScanner,
        Panel::McpTradingPanel,
    ];

    /// Identifier used in config files and logs.
    pub fn slug(self) -> &'static str {
        match self {
            Panel::MarketIndices => "market_indices",
            Panel::OptionChainTable => "option_chain_table",
            Panel::MarketStateDetector => "market_state_detector",
            Panel::ActiveStrategy => "active_strategy",
            Panel::RealTimeAlerts => "real_time_alerts",
            Panel::StockAnalysis => "stock_analysis",
            Panel::QuantDashboard => "quant_dashboard",
            Panel::GreeksHeatmap => "greeks_heatmap",
            Panel::LiveTradeSignal => "live_trade_signal",
            Panel::HighVolumeScanner => "high_volume_scanner",
            Panel::VatScanner => "vat_scanner",
            Panel::McpTradingPanel => "mcp_trading_panel",
        }
    }

    /// Default refresh cadence. Zero for the streamed alerts panel.
    pub fn default_interval(self) -> Duration {
        let secs = match self {
            Panel::MarketIndices => polling::MARKET_INDICES_SECS,
            Panel::OptionChainTable => polling::OPTION_CHAIN_SECS,
            Panel::MarketStateDetector => polling::MARKET_STATE_SECS,
            Panel::ActiveStrategy => polling::ACTIVE_STRATEGY_SECS,
            Panel::RealTimeAlerts => 0,
            Panel::StockAnalysis => polling::STOCK_ANALYSIS_SECS,
            Panel::QuantDashboard => polling::QUANT_DASHBOARD_SECS,
            Panel::GreeksHeatmap => polling::GREEKS_HEATMAP_SECS,
            Panel::LiveTradeSignal => polling::LIVE_TRADE_SIGNAL_SECS,
            Panel::HighVolumeScanner => polling::HIGH_VOLUME_SECS,
            Panel::VatScanner => polling::VAT_SCANNER_SECS,
            Panel::McpTradingPanel => polling::MCP_STATUS_SECS,
        };
        Duration::from_secs(secs)
    }

    /// Fed by the alerts WebSocket rather than polled.
    pub fn is_streaming(self) -> bool {
        self == Panel::RealTimeAlerts
    }

    /// Whether the panel's request depends on [`PanelParams::symbol`].
    pub fn uses_symbol(self) -> bool {
        matches!(
            self,
            Panel::OptionChainTable
                | Panel::MarketStateDetector
                | Panel::ActiveStrategy
                | Panel::GreeksHeatmap
                | Panel::LiveTradeSignal
                | Panel::VatScanner
        )
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Panel {
    type Err = OptionGreekError;

    fn from_str(s: &str) -> Result<Self> {
        Panel::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .ok_or_else(|| OptionGreekError::Config(format!("unknown panel {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// A dashboard tab grouping panels shown together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Overview,
    OptionChain,
    Signals,
    Scanners,
    Agent,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Overview,
        View::OptionChain,
        View::Signals,
        View::Scanners,
        View::Agent,
    ];

    /// Panels shown on this view. Alerts run globally and belong to none.
    pub fn panels(self) -> &'static [Panel] {
        match self {
            View::Overview => &[
                Panel::MarketIndices,
                Panel::MarketStateDetector,
                Panel::QuantDashboard,
                Panel::ActiveStrategy,
            ],
            View::OptionChain => &[Panel::OptionChainTable, Panel::GreeksHeatmap],
            View::Signals => &[Panel::LiveTradeSignal, Panel::VatScanner],
            View::Scanners => &[Panel::StockAnalysis, Panel::HighVolumeScanner],
            View::Agent => &[Panel::McpTradingPanel],
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            View::Overview => "overview",
            View::OptionChain => "option_chain",
            View::Signals => "signals",
            View::Scanners => "scanners",
            View::Agent => "agent",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for View {
    type Err = OptionGreekError;

    fn from_str(s: &str) -> Result<Self> {
        View::ALL
            .into_iter()
            .find(|v| v.slug() == s)
            .ok_or_else(|| OptionGreekError::InvalidArgument(format!("unknown view {s:?}")))
    }
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Request parameters shared by all panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelParams {
    /// Underlying for symbol-scoped panels.
    pub symbol: String,
    /// Strikes above/below ATM in the option chain table.
    pub strike_count: u32,
    /// Strikes in the Greeks heatmap (5–30).
    pub heatmap_strikes: u32,
    pub stock_scan: StockScanQuery,
    pub high_volume: HighVolumeQuery,
}

impl Default for PanelParams {
    fn default() -> Self {
        Self {
            symbol: NIFTY_50.to_owned(),
            strike_count: limits::DEFAULT_STRIKE_COUNT,
            heatmap_strikes: limits::DEFAULT_HEATMAP_STRIKES,
            stock_scan: StockScanQuery::default(),
            high_volume: HighVolumeQuery::default(),
        }
    }
}

impl PanelParams {
    pub fn for_symbol(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }
}
