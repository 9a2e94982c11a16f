#![allow(missing_docs)]
//! Analysis types: market-state summary, option structure analysis,
//! adjustment alerts, trade qualification.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{
    AdjustmentType, AlertLevel, Bias, Confidence, MarketState, OptionType, Recommendation,
    TimeWindow, null_default,
};
use crate::client::BackendStatus;

// ---------------------------------------------------------------------------
// Market state summary
// ---------------------------------------------------------------------------

/// A suggested buy at a specific strike.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GuidedTrade {
    /// Placement, e.g. `"ITM_BUY"` or `"ATM_BUY"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub strike: f64,
    pub instrument: OptionType,
    #[serde(default)]
    pub rationale: String,
}

/// Strike guidance attached to a market-state analysis.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StrikeGuidance {
    #[serde(default)]
    pub suggested: bool,
    #[serde(default)]
    pub bias: Option<Bias>,
    #[serde(default, deserialize_with = "null_default")]
    pub trades: Vec<GuidedTrade>,
    #[serde(default)]
    pub expert_note: Option<String>,
}

/// A strike where volume-to-OI suggests accumulation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowCluster {
    pub strike: f64,
    /// `"CALL_ACCUMULATION"` or `"PUT_ACCUMULATION"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub strength: f64,
    #[serde(default)]
    pub is_institutional: bool,
}

/// Institutional flow summary.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InstitutionalFlow {
    /// 0–100.
    #[serde(default, deserialize_with = "null_default")]
    pub intent_score: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub clusters: Vec<FlowCluster>,
    #[serde(default)]
    pub big_money_present: bool,
}

/// Alert line attached to an analysis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisAlert {
    #[serde(rename = "type")]
    pub level: AlertLevel,
    pub message: String,
}

/// Market-state analysis returned by `GET /market/state` and embedded in
/// the F&O stock scan.
///
/// When the backend cannot analyze the chain it answers `200 OK` with only
/// an `error` field; see [`BackendStatus`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MarketAnalysis {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub spot_price: Option<f64>,
    #[serde(default)]
    pub atm_strike: Option<f64>,
    #[serde(default)]
    pub state: Option<MarketState>,
    #[serde(default)]
    pub intent_score: Option<f64>,
    /// 0–100.
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub tradable: Option<bool>,
    #[serde(default)]
    pub pcr: Option<f64>,
    #[serde(default)]
    pub vix: Option<f64>,
    #[serde(default)]
    pub support: Option<f64>,
    #[serde(default)]
    pub resistance: Option<f64>,
    #[serde(default)]
    pub strike_guidance: Option<StrikeGuidance>,
    #[serde(default)]
    pub institutional_flow: Option<InstitutionalFlow>,
    #[serde(default, deserialize_with = "null_default")]
    pub alerts: Vec<AnalysisAlert>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl MarketAnalysis {
    pub fn is_tradable(&self) -> bool {
        self.tradable.unwrap_or(false)
    }

    /// Whether spot sits inside the OI support/resistance band.
    pub fn spot_in_range(&self) -> Option<bool> {
        let spot = self.spot_price?;
        let (support, resistance) = (self.support?, self.resistance?);
        Some(support <= spot && spot <= resistance)
    }
}

impl BackendStatus for MarketAnalysis {
    fn backend_error(&self) -> Option<String> {
        self.error.clone()
    }
}

// ---------------------------------------------------------------------------
// Option structure analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StructureAnalysis {
    #[serde(default)]
    pub premium_behavior: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub delta_imbalance: f64,
    #[serde(default)]
    pub oi_pattern: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response from `GET /options/analysis/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptionAnalysis {
    pub symbol: String,
    #[serde(default)]
    pub spot_price: Option<f64>,
    #[serde(default)]
    pub analysis: StructureAnalysis,
    #[serde(default, deserialize_with = "null_default")]
    pub anomalies: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Adjustments
// ---------------------------------------------------------------------------

/// An adjustment trade alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentAlert {
    #[serde(rename = "type")]
    pub kind: AdjustmentType,
    pub symbol: String,
    pub strike: f64,
    pub option_type: OptionType,
    pub reason: String,
    pub confidence: Confidence,
    pub time_window: String,
    /// Condition that cancels the setup (e.g. `"Spot > 945"`).
    pub invalidation: String,
    pub is_tradable: bool,
}

/// Response from `GET /options/adjustments/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AdjustmentsResponse {
    pub symbol: String,
    #[serde(default, deserialize_with = "null_default")]
    pub adjustments: Vec<AdjustmentAlert>,
    #[serde(default)]
    pub tradable_count: u32,
    #[serde(default)]
    pub message: Option<String>,
}

impl AdjustmentsResponse {
    /// Tradable alerts, highest confidence first.
    pub fn tradable(&self) -> Vec<&AdjustmentAlert> {
        let mut out: Vec<_> = self
            .adjustments
            .iter()
            .filter(|a| a.is_tradable && a.kind.is_tradable())
            .collect();
        out.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        out
    }
}

// ---------------------------------------------------------------------------
// Trade qualification
// ---------------------------------------------------------------------------

/// Result of a pre-trade qualification check.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TradeQualification {
    pub is_qualified: bool,
    #[serde(default)]
    pub checks: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub failed_reasons: Vec<String>,
    pub recommendation: Recommendation,
}
