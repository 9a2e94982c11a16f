//! Option chain endpoints: chain, structure analysis, adjustments.

use serde::Serialize;

use crate::client::{OptionGreekClient, path_segment};
use crate::error::Result;
use crate::types::analysis::{AdjustmentsResponse, OptionAnalysis};
use crate::types::option_chain::OptionChain;

#[derive(Serialize)]
struct ChainQuery {
    strike_count: u32,
}

impl OptionGreekClient {
    /// Option chain with `strike_count` strikes above and below ATM.
    ///
    /// **Endpoint:** `GET /api/v1/options/chain/{symbol}`
    pub async fn option_chain(&self, symbol: &str, strike_count: u32) -> Result<OptionChain> {
        self.get_query_checked(
            &format!("/options/chain/{}", path_segment(symbol)),
            &ChainQuery { strike_count },
        )
        .await
    }

    /// Premium behaviour, delta imbalance and OI pattern analysis.
    ///
    /// **Endpoint:** `GET /api/v1/options/analysis/{symbol}`
    pub async fn option_analysis(&self, symbol: &str) -> Result<OptionAnalysis> {
        self.get(&format!("/options/analysis/{}", path_segment(symbol)))
            .await
    }

    /// Adjustment trade alerts (A1–A4) for a symbol.
    ///
    /// **Endpoint:** `GET /api/v1/options/adjustments/{symbol}`
    pub async fn adjustments(&self, symbol: &str) -> Result<AdjustmentsResponse> {
        self.get(&format!("/options/adjustments/{}", path_segment(symbol)))
            .await
    }
}
