#![allow(missing_docs)]
//! Nifty sentiment dashboard types.
//!
//! Each section is fetched independently by the backend and may come back
//! as `{"error": "..."}` with every other field missing, so all values are
//! optional.

use serde::Deserialize;

/// India VIX reading.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VixReading {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_pct: Option<f64>,
    /// `"up"`, `"down"` or `"flat"`.
    #[serde(default)]
    pub trend: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Nifty put/call ratio.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PcrReading {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub pcr: Option<f64>,
    #[serde(default)]
    pub total_call_oi: Option<f64>,
    #[serde(default)]
    pub total_put_oi: Option<f64>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Advance/decline breadth across the index constituents.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MarketBreadth {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub advances: u32,
    #[serde(default)]
    pub declines: u32,
    #[serde(default)]
    pub unchanged: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub ratio: Option<f64>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Intraday OI change on calls and puts.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OiChange {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub call_oi_change: f64,
    #[serde(default)]
    pub put_oi_change: f64,
    #[serde(default)]
    pub net_change: Option<f64>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// OI-derived key levels.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KeyLevels {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub spot: Option<f64>,
    #[serde(default)]
    pub support: Option<f64>,
    #[serde(default)]
    pub support_oi: Option<f64>,
    #[serde(default)]
    pub resistance: Option<f64>,
    #[serde(default)]
    pub resistance_oi: Option<f64>,
    /// Display string, e.g. `"23900 - 24200"`.
    #[serde(default)]
    pub range: Option<String>,
}

/// Response from `GET /market/nifty-sentiment`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NiftySentiment {
    #[serde(default)]
    pub vix: VixReading,
    #[serde(default)]
    pub pcr: PcrReading,
    #[serde(default)]
    pub breadth: MarketBreadth,
    #[serde(default)]
    pub oi_change: OiChange,
    #[serde(default)]
    pub levels: KeyLevels,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl NiftySentiment {
    /// Sections that failed, as `(section, error)` pairs.
    pub fn section_errors(&self) -> Vec<(&'static str, &str)> {
        [
            ("vix", self.vix.error.as_deref()),
            ("pcr", self.pcr.error.as_deref()),
            ("breadth", self.breadth.error.as_deref()),
            ("oi_change", self.oi_change.error.as_deref()),
            ("levels", self.levels.error.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, err)| err.map(|e| (name, e)))
        .collect()
    }
}
