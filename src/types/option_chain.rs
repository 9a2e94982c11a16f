//! Option Chain types: strike rows, CE/PE quotes, Greeks, expiries.
//!
//! Also carries the small amount of display logic the option chain table
//! needs: moneyness classification, PCR and ATM lookup.

use serde::{Deserialize, Serialize};

use super::{OptionType, null_default, success_flag_error};
use crate::client::BackendStatus;

/// Strikes closer than this are treated as equal.
const STRIKE_EPSILON: f64 = 1e-6;

// ---------------------------------------------------------------------------
// Greeks
// ---------------------------------------------------------------------------

/// Option Greeks for a single contract, computed by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    #[serde(default, deserialize_with = "null_default")]
    pub delta: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub gamma: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub theta: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub vega: f64,
    #[serde(default)]
    pub rho: Option<f64>,
    /// Set when the backend fell back to an approximation.
    #[serde(default)]
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Option Quote (per CE/PE)
// ---------------------------------------------------------------------------

/// Market data for a single call or put at a given strike.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub ltp: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub oi: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub oi_change: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub oi_change_pct: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub volume: i64,
    /// Implied volatility in percent.
    #[serde(default)]
    pub iv: Option<f64>,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    /// Absolute LTP change on the day.
    #[serde(default, deserialize_with = "null_default")]
    pub chg: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub chg_pct: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub prev_oi: i64,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub theta: Option<f64>,
    #[serde(default)]
    pub vega: Option<f64>,
}

impl OptionQuote {
    /// Bid/ask spread, when both sides are quoted.
    pub fn spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) if bid > 0.0 && ask > 0.0 => Some(ask - bid),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Strike Row
// ---------------------------------------------------------------------------

/// Call and put data at one strike price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrikeRow {
    pub strike_price: f64,
    /// Call data (absent if no CE trades at this strike).
    #[serde(default)]
    pub call: Option<OptionQuote>,
    /// Put data (absent if no PE trades at this strike).
    #[serde(default)]
    pub put: Option<OptionQuote>,
    #[serde(default)]
    pub call_greeks: Option<Greeks>,
    #[serde(default)]
    pub put_greeks: Option<Greeks>,
    #[serde(default, deserialize_with = "null_default")]
    pub call_oi: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub put_oi: i64,
    #[serde(default)]
    pub call_iv: Option<f64>,
    #[serde(default)]
    pub put_iv: Option<f64>,
}

impl StrikeRow {
    /// The quote for one side of the strike.
    pub fn side(&self, option_type: OptionType) -> Option<&OptionQuote> {
        match option_type {
            OptionType::CE => self.call.as_ref(),
            OptionType::PE => self.put.as_ref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// One available expiry of the underlying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryInfo {
    /// Display date (e.g. `"26-12-2024"`).
    #[serde(default)]
    pub date: Option<String>,
    /// Expiry as an epoch timestamp; the upstream sends it as a string or a number.
    #[serde(default)]
    pub expiry: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Moneyness
// ---------------------------------------------------------------------------

/// Moneyness of a strike relative to spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Moneyness {
    ATM,
    ITM,
    OTM,
}

impl Moneyness {
    /// Classify `strike` for `option_type`.
    ///
    /// The ATM strike (when known) is `ATM` for both sides. Otherwise a call
    /// is ITM below spot and a put is ITM above spot.
    pub fn classify(
        strike: f64,
        spot: f64,
        atm_strike: Option<f64>,
        option_type: OptionType,
    ) -> Self {
        if atm_strike.is_some_and(|atm| (atm - strike).abs() < STRIKE_EPSILON) {
            return Self::ATM;
        }
        let itm = match option_type {
            OptionType::CE => strike < spot,
            OptionType::PE => strike > spot,
        };
        if itm { Self::ITM } else { Self::OTM }
    }
}

// ---------------------------------------------------------------------------
// Option Chain Response
// ---------------------------------------------------------------------------

/// Response from `GET /options/chain/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub spot_price: Option<f64>,
    #[serde(default)]
    pub atm_strike: Option<f64>,
    #[serde(default)]
    pub total_call_oi: Option<i64>,
    #[serde(default)]
    pub total_put_oi: Option<i64>,
    #[serde(default)]
    pub pcr: Option<f64>,
    #[serde(default)]
    pub india_vix: Option<f64>,
    #[serde(default, deserialize_with = "null_default")]
    pub expiries: Vec<ExpiryInfo>,
    /// Rows sorted by ascending strike.
    #[serde(default, deserialize_with = "null_default")]
    pub chain: Vec<StrikeRow>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl OptionChain {
    /// Put-call ratio.
    ///
    /// Uses the backend's value when present, otherwise total put OI over
    /// total call OI across the returned rows. `None` when there is no call OI.
    pub fn pcr(&self) -> Option<f64> {
        if let Some(pcr) = self.pcr {
            return Some(pcr);
        }
        let call_oi: i64 = self.chain.iter().map(|r| r.call_oi).sum();
        let put_oi: i64 = self.chain.iter().map(|r| r.put_oi).sum();
        (call_oi > 0).then(|| put_oi as f64 / call_oi as f64)
    }

    /// The listed strike closest to `spot`.
    pub fn nearest_strike(&self, spot: f64) -> Option<f64> {
        self.chain
            .iter()
            .map(|r| r.strike_price)
            .min_by(|a, b| (a - spot).abs().total_cmp(&(b - spot).abs()))
    }

    /// The row at exactly `strike`.
    pub fn row(&self, strike: f64) -> Option<&StrikeRow> {
        self.chain
            .iter()
            .find(|r| (r.strike_price - strike).abs() < STRIKE_EPSILON)
    }

    /// The ATM row: the backend's ATM strike, or the strike nearest spot.
    pub fn atm_row(&self) -> Option<&StrikeRow> {
        let atm = self
            .atm_strike
            .or_else(|| self.spot_price.and_then(|s| self.nearest_strike(s)))?;
        self.row(atm)
    }

    /// Moneyness of `strike` for `option_type`, if spot is known.
    pub fn moneyness(&self, strike: f64, option_type: OptionType) -> Option<Moneyness> {
        self.spot_price
            .map(|spot| Moneyness::classify(strike, spot, self.atm_strike, option_type))
    }
}

impl BackendStatus for OptionChain {
    fn backend_error(&self) -> Option<String> {
        success_flag_error(self.success, self.error.as_deref(), "option chain")
    }
}
