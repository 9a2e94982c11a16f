//! Market data endpoints: spot, market state, indices, history, scanners,
//! sentiment, live signals and the Greeks heatmap.

use serde::Serialize;

use crate::client::{OptionGreekClient, path_segment};
use crate::error::Result;
use crate::types::analysis::MarketAnalysis;
use crate::types::heatmap::{GreeksHeatmap, HeatmapQuery};
use crate::types::market::{HistoryQuery, HistoryResponse, IndicesResponse, SpotPrice};
use crate::types::scanner::{
    BulkAnalysisRequest, BulkAnalysisResponse, FnoStocksResponse, HighVolumeQuery,
    HighVolumeScanResponse, StockScanQuery, StockScanResponse,
};
use crate::types::sentiment::NiftySentiment;
use crate::types::signal::LiveTradeSignal;

#[derive(Serialize)]
struct SymbolQuery<'a> {
    symbol: &'a str,
}

impl OptionGreekClient {
    // -----------------------------------------------------------------------
    // Quotes
    // -----------------------------------------------------------------------

    /// Spot price of a symbol (e.g. `"NSE:RELIANCE-EQ"`).
    ///
    /// **Endpoint:** `GET /api/v1/market/spot/{symbol}`
    pub async fn spot_price(&self, symbol: &str) -> Result<SpotPrice> {
        self.get_checked(&format!("/market/spot/{}", path_segment(symbol)))
            .await
    }

    /// Major index quotes (NIFTY 50, BANK, FIN, SENSEX, ...).
    ///
    /// A broker outage comes back as `success: false` and is reported as
    /// [`OptionGreekError::Backend`](crate::error::OptionGreekError::Backend).
    ///
    /// **Endpoint:** `GET /api/v1/market/indices`
    pub async fn indices(&self) -> Result<IndicesResponse> {
        self.get_checked("/market/indices").await
    }

    /// OHLCV candles.
    ///
    /// **Endpoint:** `GET /api/v1/market/history/{symbol}`
    pub async fn history(&self, symbol: &str, query: &HistoryQuery) -> Result<HistoryResponse> {
        self.get_query_checked(&format!("/market/history/{}", path_segment(symbol)), query)
            .await
    }

    // -----------------------------------------------------------------------
    // Analysis
    // -----------------------------------------------------------------------

    /// Market state of a symbol (TREND / RANGE / INTENT / NO-TRADE /
    /// ADJUSTMENT), with strike guidance and institutional flow.
    ///
    /// **Endpoint:** `GET /api/v1/market/state?symbol=`
    pub async fn market_state(&self, symbol: &str) -> Result<MarketAnalysis> {
        self.get_query_checked("/market/state", &SymbolQuery { symbol })
            .await
    }

    /// Nifty sentiment dashboard: VIX, PCR, breadth, OI change, key levels.
    ///
    /// Sections fail independently; see
    /// [`NiftySentiment::section_errors`].
    ///
    /// **Endpoint:** `GET /api/v1/market/nifty-sentiment`
    pub async fn nifty_sentiment(&self) -> Result<NiftySentiment> {
        self.get("/market/nifty-sentiment").await
    }

    /// Live trade signal with entry, stop-loss and target.
    ///
    /// **Endpoint:** `GET /api/v1/market/live-trade-signal/{symbol}`
    pub async fn live_trade_signal(&self, symbol: &str) -> Result<LiveTradeSignal> {
        self.get(&format!("/market/live-trade-signal/{}", path_segment(symbol)))
            .await
    }

    /// Strike-wise Greeks for both sides around ATM.
    ///
    /// **Endpoint:** `GET /api/v1/market/greeks-heatmap/{symbol}`
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `strike_count` is outside 5–30.
    pub async fn greeks_heatmap(&self, symbol: &str, strike_count: u32) -> Result<GreeksHeatmap> {
        let query = HeatmapQuery { strike_count };
        query.validate()?;
        self.get_query(
            &format!("/market/greeks-heatmap/{}", path_segment(symbol)),
            &query,
        )
        .await
    }

    // -----------------------------------------------------------------------
    // Scanners
    // -----------------------------------------------------------------------

    /// Scan F&O stocks for market state, tradable names first.
    ///
    /// **Endpoint:** `GET /api/v1/market/stocks/scan`
    pub async fn scan_fno_stocks(&self, query: &StockScanQuery) -> Result<StockScanResponse> {
        query.validate()?;
        self.get_query_checked("/market/stocks/scan", query).await
    }

    /// Stocks trading on unusually high relative volume with buying
    /// pressure.
    ///
    /// **Endpoint:** `GET /api/v1/market/high-volume-scan`
    pub async fn high_volume_scan(&self, query: &HighVolumeQuery) -> Result<HighVolumeScanResponse> {
        query.validate()?;
        self.get_query_checked("/market/high-volume-scan", query)
            .await
    }

    /// The F&O stock universe.
    ///
    /// **Endpoint:** `GET /api/v1/market/fno-stocks`
    pub async fn fno_stocks(&self) -> Result<FnoStocksResponse> {
        self.get_checked("/market/fno-stocks").await
    }

    /// Rank up to 20 symbols by option-chain breakout potential.
    ///
    /// **Endpoint:** `POST /api/v1/market/bulk-oc-analysis`
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty list or more than 20 symbols.
    pub async fn bulk_oc_analysis<S: AsRef<str>>(&self, symbols: &[S]) -> Result<BulkAnalysisResponse> {
        let body = BulkAnalysisRequest::new(symbols.iter().map(|s| s.as_ref().to_owned()))?;
        self.post_checked("/market/bulk-oc-analysis", &body).await
    }
}
