//! Value Adjustment Theory (VAT) scan.
//!
//! Compares premiums of a call and a put equidistant from the anchor
//! (ATM) strike. A large gap marks the cheaper leg as undervalued, with
//! the richer leg's premium as the theoretical target.

use serde::Deserialize;

use super::{VatSignal, success_flag_error};
use crate::client::BackendStatus;

/// One equidistant strike pair.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VatLeg {
    /// Strikes away from the anchor.
    pub offset: i32,
    pub call_strike: f64,
    pub put_strike: f64,
    #[serde(default)]
    pub ce_ltp: f64,
    #[serde(default)]
    pub pe_ltp: f64,
    /// Absolute premium difference between the two legs.
    #[serde(default)]
    pub gap: f64,
    #[serde(default)]
    pub is_opportunity: bool,
    pub signal: VatSignal,
    #[serde(default)]
    pub undervalued_strike: Option<f64>,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub theoretical_target: Option<f64>,
}

impl VatLeg {
    /// Premium the undervalued leg would gain on full mean reversion.
    pub fn potential(&self) -> Option<f64> {
        Some(self.theoretical_target? - self.entry_price?)
    }
}

/// Response from `GET /strategies/vat/scan`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VatScan {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub spot_price: Option<f64>,
    #[serde(default)]
    pub anchor_strike: Option<f64>,
    #[serde(default)]
    pub total_opportunities: u32,
    #[serde(default)]
    pub opportunities: Vec<VatLeg>,
    #[serde(default)]
    pub full_analysis: Vec<VatLeg>,
}

impl VatScan {
    /// Opportunity with the widest gap.
    pub fn best(&self) -> Option<&VatLeg> {
        self.opportunities
            .iter()
            .max_by(|a, b| a.gap.total_cmp(&b.gap))
    }
}

impl BackendStatus for VatScan {
    fn backend_error(&self) -> Option<String> {
        success_flag_error(self.success, self.error.as_deref(), "VAT scan")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_with_opportunity() {
        let scan: VatScan = serde_json::from_str(
            r#"{"success": true, "symbol": "NSE:NIFTY50-INDEX", "spot_price": 24012.4, "anchor_strike": 24000,
                "total_opportunities": 1,
                "opportunities": [
                    {"offset": 2, "call_strike": 24100, "put_strike": 23900, "ce_ltp": 62.5, "pe_ltp": 48.0,
                     "gap": 14.5, "is_opportunity": true, "signal": "BUY_PE", "undervalued_strike": 23900,
                     "entry_price": 48.0, "theoretical_target": 62.5}
                ],
                "full_analysis": [
                    {"offset": 1, "call_strike": 24050, "put_strike": 23950, "ce_ltp": 90.0, "pe_ltp": 88.5,
                     "gap": 1.5, "is_opportunity": false, "signal": "NONE", "undervalued_strike": null,
                     "entry_price": 0, "theoretical_target": 0}
                ]}"#,
        )
        .unwrap();

        assert!(scan.backend_error().is_none());
        let best = scan.best().unwrap();
        assert_eq!(best.signal, VatSignal::BUY_PE);
        assert_eq!(best.potential(), Some(14.5));
        assert_eq!(scan.full_analysis[0].undervalued_strike, None);
    }

    #[test]
    fn failed_scan() {
        let scan: VatScan =
            serde_json::from_str(r#"{"success": false, "error": "No data available"}"#).unwrap();
        assert_eq!(scan.backend_error().as_deref(), Some("No data available"));
        assert!(scan.best().is_none());
    }
}
