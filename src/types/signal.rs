#![allow(missing_docs)]
//! Live trade signal types: OI concentration, Greeks score, breakout
//! signals and trade recommendations.

use serde::Deserialize;

use super::{Bias, Confidence, MarketState, OptionType, TradeAction, null_default};

// ---------------------------------------------------------------------------
// OI concentration
// ---------------------------------------------------------------------------

/// Combined OI at one strike.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StrikeConcentration {
    pub strike: f64,
    #[serde(default)]
    pub call_oi: i64,
    #[serde(default)]
    pub put_oi: i64,
    #[serde(default)]
    pub total_oi: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub pcr: f64,
}

/// OI-derived support and resistance.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OiAnalysis {
    /// Strike with the highest put OI.
    #[serde(default)]
    pub support: Option<f64>,
    /// Strike with the highest call OI.
    #[serde(default)]
    pub resistance: Option<f64>,
    #[serde(default)]
    pub support_oi: Option<i64>,
    #[serde(default)]
    pub resistance_oi: Option<i64>,
    #[serde(default, deserialize_with = "null_default")]
    pub concentrations: Vec<StrikeConcentration>,
}

// ---------------------------------------------------------------------------
// Greeks score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GreeksBreakdown {
    #[serde(default)]
    pub delta_ratio: Option<f64>,
    #[serde(default)]
    pub delta_bias: Option<Bias>,
    #[serde(default)]
    pub max_gamma_strike: Option<f64>,
    #[serde(default)]
    pub max_gamma: Option<f64>,
}

/// Chain-wide Greeks score (0–100) and its breakdown.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GreeksAnalysis {
    #[serde(default, deserialize_with = "null_default")]
    pub score: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub analysis: GreeksBreakdown,
}

// ---------------------------------------------------------------------------
// Breakout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BreakoutSignal {
    /// E.g. `"HIGH_ATM_ACTIVITY"`, `"BULLISH_IV_SKEW"`, `"NEAR_DAY_HIGH"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    /// `"STRONG"` or `"MODERATE"`.
    #[serde(default)]
    pub strength: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BreakoutAnalysis {
    #[serde(default, deserialize_with = "null_default")]
    pub signals: Vec<BreakoutSignal>,
    #[serde(default, deserialize_with = "null_default")]
    pub breakout_score: f64,
    #[serde(default)]
    pub is_breakout: bool,
}

// ---------------------------------------------------------------------------
// Trade recommendation
// ---------------------------------------------------------------------------

/// Actionable recommendation produced alongside a signal.
///
/// `WAIT` and `NO_TRADE` carry only `reason` (and possibly `suggestion`);
/// `BUY` carries the full entry/stop/target set.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeRecommendation {
    pub action: TradeAction,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub option_type: Option<OptionType>,
    #[serde(default)]
    pub strike: Option<f64>,
    /// Free text such as `"Near ₹24010"`.
    #[serde(default)]
    pub entry_zone: Option<String>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub target: Option<f64>,
    #[serde(default)]
    pub confidence: Option<Confidence>,
}

impl TradeRecommendation {
    /// Reward-to-risk measured on the underlying, for `BUY` recommendations
    /// with a reference price.
    pub fn reward_risk(&self, reference: f64) -> Option<f64> {
        if self.action != TradeAction::BUY {
            return None;
        }
        let (stop, target) = (self.stop_loss?, self.target?);
        let risk = (reference - stop).abs();
        (risk > 0.0).then(|| (target - reference).abs() / risk)
    }
}

// ---------------------------------------------------------------------------
// Live trade signal
// ---------------------------------------------------------------------------

/// Response from `GET /market/live-trade-signal/{symbol}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LiveTradeSignal {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub spot_price: f64,
    #[serde(default)]
    pub atm_strike: Option<f64>,
    #[serde(default)]
    pub oi_analysis: OiAnalysis,
    #[serde(default)]
    pub greeks_analysis: GreeksAnalysis,
    #[serde(default)]
    pub intel_state: Option<MarketState>,
    #[serde(default)]
    pub tradable: Option<bool>,
    pub trade_recommendation: TradeRecommendation,
    #[serde(default)]
    pub timestamp: Option<String>,
}
