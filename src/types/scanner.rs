#![allow(missing_docs)]
//! Scanner types: F&O stock scan, high-volume scan, bulk option-chain
//! analysis, F&O stock list.

use serde::{Deserialize, Serialize};

use super::analysis::MarketAnalysis;
use super::signal::{BreakoutAnalysis, GreeksAnalysis, OiAnalysis, TradeRecommendation};
use super::{MarketState, ScanTimeframe, StockCap, null_default, success_flag_error};
use crate::client::BackendStatus;
use crate::constants::limits;
use crate::error::{OptionGreekError, Result};

/// A per-symbol failure reported by a scan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SymbolError {
    pub symbol: String,
    pub error: String,
}

// ---------------------------------------------------------------------------
// F&O stock scan
// ---------------------------------------------------------------------------

/// Query parameters for `GET /market/stocks/scan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockScanQuery {
    /// Maximum stocks to return (1–50).
    pub limit: u32,
    /// Only TREND/INTENT stocks.
    pub tradable_only: bool,
    /// Scan only the top high-volume names.
    pub top_only: bool,
}

impl Default for StockScanQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            tradable_only: false,
            top_only: true,
        }
    }
}

impl StockScanQuery {
    pub fn validate(&self) -> Result<()> {
        if !limits::STOCK_SCAN_LIMIT.contains(&self.limit) {
            return Err(OptionGreekError::InvalidArgument(format!(
                "stock scan limit must be within {:?}, got {}",
                limits::STOCK_SCAN_LIMIT,
                self.limit
            )));
        }
        Ok(())
    }
}

/// Response from `GET /market/stocks/scan`, tradable stocks first.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StockScanResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub total_scanned: u32,
    #[serde(default)]
    pub tradable_count: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub stocks: Vec<MarketAnalysis>,
    #[serde(default, deserialize_with = "null_default")]
    pub errors: Vec<SymbolError>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl BackendStatus for StockScanResponse {
    fn backend_error(&self) -> Option<String> {
        success_flag_error(self.success, None, "stock scan")
    }
}

// ---------------------------------------------------------------------------
// High-volume scan
// ---------------------------------------------------------------------------

/// Query parameters for `GET /market/high-volume-scan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighVolumeQuery {
    pub timeframe: ScanTimeframe,
    /// Stocks to return (1–20).
    pub top_count: u32,
}

impl Default for HighVolumeQuery {
    fn default() -> Self {
        Self {
            timeframe: ScanTimeframe::Min15,
            top_count: 5,
        }
    }
}

impl HighVolumeQuery {
    pub fn validate(&self) -> Result<()> {
        if !limits::HIGH_VOLUME_TOP.contains(&self.top_count) {
            return Err(OptionGreekError::InvalidArgument(format!(
                "top_count must be within {:?}, got {}",
                limits::HIGH_VOLUME_TOP,
                self.top_count
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VolumeStats {
    #[serde(default, deserialize_with = "null_default")]
    pub current_volume: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub avg_volume: f64,
    /// Current volume over the 20-period average.
    #[serde(default, deserialize_with = "null_default")]
    pub relative_volume: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BuyingPressure {
    #[serde(default)]
    pub is_buying: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub strength: f64,
    #[serde(default)]
    pub pattern: Option<String>,
    /// Close position within the candle range, 0 (low) to 1 (high).
    #[serde(default)]
    pub close_position: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HighVolumeStock {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "other_cap")]
    pub cap: StockCap,
    pub price: f64,
    #[serde(default)]
    pub price_change_pct: f64,
    #[serde(default)]
    pub volume: VolumeStats,
    #[serde(default)]
    pub buying_pressure: BuyingPressure,
    #[serde(default)]
    pub composite_score: f64,
}

fn other_cap() -> StockCap {
    StockCap::OTHER
}

/// Response from `GET /market/high-volume-scan`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HighVolumeScanResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// E.g. `"15min"`.
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub total_scanned: u32,
    #[serde(default)]
    pub high_volume_count: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub top_stocks: Vec<HighVolumeStock>,
    #[serde(default, deserialize_with = "null_default")]
    pub all_high_volume: Vec<HighVolumeStock>,
    #[serde(default)]
    pub errors_count: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub errors: Vec<SymbolError>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl BackendStatus for HighVolumeScanResponse {
    fn backend_error(&self) -> Option<String> {
        success_flag_error(self.success, self.error.as_deref(), "high-volume scan")
    }
}

// ---------------------------------------------------------------------------
// Bulk option-chain analysis
// ---------------------------------------------------------------------------

/// Body of `POST /market/bulk-oc-analysis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkAnalysisRequest {
    pub symbols: Vec<String>,
}

impl BulkAnalysisRequest {
    pub fn new<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() {
            return Err(OptionGreekError::InvalidArgument("no symbols provided".into()));
        }
        if symbols.len() > limits::MAX_BULK_SYMBOLS {
            return Err(OptionGreekError::InvalidArgument(format!(
                "maximum {} symbols allowed per request, got {}",
                limits::MAX_BULK_SYMBOLS,
                symbols.len()
            )));
        }
        Ok(Self { symbols })
    }
}

/// Condensed market-state view embedded in bulk results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IntelSummary {
    #[serde(default)]
    pub state: Option<MarketState>,
    #[serde(default)]
    pub tradable: Option<bool>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BulkAnalysisResult {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub spot_price: f64,
    #[serde(default)]
    pub day_high: Option<f64>,
    #[serde(default)]
    pub atm_strike: Option<f64>,
    #[serde(default)]
    pub composite_score: f64,
    #[serde(default)]
    pub oi_analysis: OiAnalysis,
    #[serde(default)]
    pub breakout_analysis: BreakoutAnalysis,
    #[serde(default)]
    pub greeks_analysis: GreeksAnalysis,
    #[serde(default)]
    pub intel_analysis: IntelSummary,
    #[serde(default, deserialize_with = "null_default")]
    pub reasons: Vec<String>,
    /// 1-based rank by composite score.
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub trade_recommendation: Option<TradeRecommendation>,
}

/// Response from `POST /market/bulk-oc-analysis`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BulkAnalysisResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total_analyzed: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub results: Vec<BulkAnalysisResult>,
    #[serde(default, deserialize_with = "null_default")]
    pub errors: Vec<SymbolError>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl BackendStatus for BulkAnalysisResponse {
    fn backend_error(&self) -> Option<String> {
        success_flag_error(self.success, None, "bulk option-chain analysis")
    }
}

// ---------------------------------------------------------------------------
// F&O stock list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FnoStock {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "other_cap")]
    pub cap: StockCap,
}

/// Response from `GET /market/fno-stocks`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FnoStocksResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub count: u32,
    #[serde(default, deserialize_with = "null_default")]
    pub stocks: Vec<FnoStock>,
}

impl BackendStatus for FnoStocksResponse {
    fn backend_error(&self) -> Option<String> {
        success_flag_error(self.success, None, "F&O stock list")
    }
}
