//! Shared enum types that map directly to OptionGreek API string values.
//!
//! Variant names mirror the `SCREAMING_SNAKE_CASE` wire values where the
//! backend uses them, so we suppress the Rust naming convention lint.
#![allow(non_camel_case_types)]

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Option Type
// ---------------------------------------------------------------------------

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option.
    CE,
    /// Put option.
    PE,
}

// ---------------------------------------------------------------------------
// Market State
// ---------------------------------------------------------------------------

/// Market state classification produced by the backend's intelligence engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketState {
    /// Directional move.
    TREND,
    /// Sideways between OI support and resistance.
    RANGE,
    /// Adjustment window; watch ATM premiums.
    ADJUSTMENT,
    /// Institutional accumulation detected.
    INTENT,
    /// Illiquid, noisy or closed market.
    #[serde(rename = "NO-TRADE", alias = "NO_TRADE")]
    NO_TRADE,
    /// A state this client version does not know.
    #[serde(other)]
    UNKNOWN,
}

impl MarketState {
    /// Display label as shown on the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Self::TREND => "Trend",
            Self::RANGE => "Range",
            Self::ADJUSTMENT => "Adjustment",
            Self::INTENT => "Intent",
            Self::NO_TRADE => "No Trade",
            Self::UNKNOWN => "Unknown",
        }
    }
}

impl fmt::Display for MarketState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Adjustment Type
// ---------------------------------------------------------------------------

/// Adjustment trade classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustmentType {
    /// Premium correction.
    A1,
    /// Institutional hedge unwind.
    A2,
    /// Fake breakout.
    A3,
    /// Liquidity distortion.
    A4,
}

impl AdjustmentType {
    /// Only premium corrections and hedge unwinds are tradable.
    pub fn is_tradable(self) -> bool {
        matches!(self, Self::A1 | Self::A2)
    }
}

// ---------------------------------------------------------------------------
// Time Window
// ---------------------------------------------------------------------------

/// Intraday session window (IST) used to qualify signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    PreMarket,
    /// 09:15 – 10:30.
    Noise,
    /// 10:30 – 12:30.
    Structure,
    /// 12:30 – 14:30.
    Traps,
    /// 14:30 – 15:20.
    Adjustment,
    /// 15:20 – 15:30.
    HighRisk,
    PostMarket,
    #[serde(other)]
    Unknown,
}

impl TimeWindow {
    /// Session span of the window, if it is an in-market window.
    pub fn span(self) -> Option<&'static str> {
        match self {
            Self::Noise => Some("09:15-10:30"),
            Self::Structure => Some("10:30-12:30"),
            Self::Traps => Some("12:30-14:30"),
            Self::Adjustment => Some("14:30-15:20"),
            Self::HighRisk => Some("15:20-15:30"),
            Self::PreMarket | Self::PostMarket | Self::Unknown => None,
        }
    }

    /// Whether the window falls inside market hours.
    pub fn is_market_hours(self) -> bool {
        self.span().is_some()
    }
}

// ---------------------------------------------------------------------------
// Confidence / Recommendation / Action
// ---------------------------------------------------------------------------

/// Qualitative confidence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Confidence {
    LOW,
    MEDIUM,
    HIGH,
}

/// Outcome of a trade qualification check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recommendation {
    TRADE,
    NO_TRADE,
    WAIT,
}

/// Action of a generated trade recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeAction {
    BUY,
    WAIT,
    NO_TRADE,
}

/// Directional bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bias {
    BULLISH,
    BEARISH,
    NEUTRAL,
}

// ---------------------------------------------------------------------------
// Scanner enums
// ---------------------------------------------------------------------------

/// Signal emitted by the Value Adjustment Theory scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatSignal {
    /// The call leg is undervalued.
    BUY_CE,
    /// The put leg is undervalued.
    BUY_PE,
    NONE,
}

/// Market-cap class of an F&O stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockCap {
    LARGE_CAP,
    MID_CAP,
    #[serde(other)]
    OTHER,
}

/// Severity of an analysis alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    SIGNAL,
    INFO,
    WARNING,
    #[serde(other)]
    OTHER,
}

// ---------------------------------------------------------------------------
// Query enums
// ---------------------------------------------------------------------------

/// Candle resolution for the history endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "1")]
    Min1,
    #[serde(rename = "5")]
    Min5,
    #[serde(rename = "15")]
    Min15,
    #[serde(rename = "30")]
    Min30,
    #[serde(rename = "60")]
    Min60,
    #[serde(rename = "D")]
    Day,
    #[serde(rename = "W")]
    Week,
    #[serde(rename = "M")]
    Month,
}

/// Candle timeframe for the high-volume scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanTimeframe {
    #[serde(rename = "15")]
    Min15,
    #[serde(rename = "60")]
    Hour1,
}
