//! Strike-wise Greeks heatmap.

use serde::{Deserialize, Serialize};

use super::OptionType;
use crate::constants::limits;
use crate::error::{OptionGreekError, Result};

/// Query parameters for `GET /market/greeks-heatmap/{symbol}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapQuery {
    /// Strikes around ATM (5–30).
    pub strike_count: u32,
}

impl Default for HeatmapQuery {
    fn default() -> Self {
        Self {
            strike_count: limits::DEFAULT_HEATMAP_STRIKES,
        }
    }
}

impl HeatmapQuery {
    /// Check `strike_count` against the accepted range.
    pub fn validate(&self) -> Result<()> {
        if !limits::HEATMAP_STRIKES.contains(&self.strike_count) {
            return Err(OptionGreekError::InvalidArgument(format!(
                "heatmap strike_count must be within {:?}, got {}",
                limits::HEATMAP_STRIKES,
                self.strike_count
            )));
        }
        Ok(())
    }
}

/// Greeks for both sides of one strike. Missing values arrive as `0`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HeatmapRow {
    pub strike: f64,
    #[serde(default)]
    pub is_atm: bool,
    #[serde(default)]
    pub is_itm_ce: bool,
    #[serde(default)]
    pub is_itm_pe: bool,
    #[serde(default)]
    pub call_delta: f64,
    #[serde(default)]
    pub call_gamma: f64,
    #[serde(default)]
    pub call_theta: f64,
    #[serde(default)]
    pub call_vega: f64,
    #[serde(default)]
    pub call_iv: f64,
    #[serde(default)]
    pub call_oi: f64,
    #[serde(default)]
    pub call_ltp: f64,
    #[serde(default)]
    pub put_delta: f64,
    #[serde(default)]
    pub put_gamma: f64,
    #[serde(default)]
    pub put_theta: f64,
    #[serde(default)]
    pub put_vega: f64,
    #[serde(default)]
    pub put_iv: f64,
    #[serde(default)]
    pub put_oi: f64,
    #[serde(default)]
    pub put_ltp: f64,
}

impl HeatmapRow {
    /// Combined absolute gamma of both sides.
    pub fn total_gamma(&self) -> f64 {
        self.call_gamma.abs() + self.put_gamma.abs()
    }

    pub fn is_itm(&self, side: OptionType) -> bool {
        match side {
            OptionType::CE => self.is_itm_ce,
            OptionType::PE => self.is_itm_pe,
        }
    }
}

/// Response from `GET /market/greeks-heatmap/{symbol}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GreeksHeatmap {
    pub symbol: String,
    #[serde(default)]
    pub spot_price: f64,
    #[serde(default)]
    pub atm_strike: f64,
    /// Strike with the largest combined gamma (the pivot).
    #[serde(default)]
    pub max_gamma_strike: Option<f64>,
    #[serde(default)]
    pub heatmap: Vec<HeatmapRow>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl GreeksHeatmap {
    /// Row with the largest combined gamma. Ties resolve to the first row.
    pub fn max_gamma_row(&self) -> Option<&HeatmapRow> {
        self.heatmap.iter().fold(None, |best, row| match best {
            Some(b) if b.total_gamma() >= row.total_gamma() => Some(b),
            _ => Some(row),
        })
    }

    pub fn atm_row(&self) -> Option<&HeatmapRow> {
        self.heatmap.iter().find(|r| r.is_atm)
    }
}
