//! Periodic panel refresh.
//!
//! A [`PanelPoller`] task fetches one panel's data on a fixed interval and
//! publishes a [`PanelState`] on a `watch` channel. A failed fetch keeps the
//! last good data and records the error; the next success clears it.
//! [`PanelHandle::refresh`] forces an immediate fetch (retry-on-click).

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::panel::{Panel, PanelParams};
use crate::client::OptionGreekClient;
use crate::error::{OptionGreekError, Result};
use crate::types::analysis::{AdjustmentsResponse, MarketAnalysis};
use crate::types::heatmap::GreeksHeatmap;
use crate::types::market::IndicesResponse;
use crate::types::mcp::McpStatus;
use crate::types::option_chain::OptionChain;
use crate::types::scanner::{HighVolumeScanResponse, StockScanResponse};
use crate::types::sentiment::NiftySentiment;
use crate::types::signal::LiveTradeSignal;
use crate::types::strategies::VatScan;

// ---------------------------------------------------------------------------
// Panel data
// ---------------------------------------------------------------------------

/// Data of one polled panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    MarketIndices(IndicesResponse),
    OptionChain(OptionChain),
    MarketState(MarketAnalysis),
    ActiveStrategy(AdjustmentsResponse),
    StockAnalysis(StockScanResponse),
    QuantDashboard(NiftySentiment),
    GreeksHeatmap(GreeksHeatmap),
    LiveTradeSignal(LiveTradeSignal),
    HighVolume(HighVolumeScanResponse),
    VatScanner(VatScan),
    McpStatus(McpStatus),
}

impl PanelData {
    /// The panel this data belongs to.
    pub fn panel(&self) -> Panel {
        match self {
            PanelData::MarketIndices(_) => Panel::MarketIndices,
            PanelData::OptionChain(_) => Panel::OptionChainTable,
            PanelData::MarketState(_) => Panel::MarketStateDetector,
            PanelData::ActiveStrategy(_) => Panel::ActiveStrategy,
            PanelData::StockAnalysis(_) => Panel::StockAnalysis,
            PanelData::QuantDashboard(_) => Panel::QuantDashboard,
            PanelData::GreeksHeatmap(_) => Panel::GreeksHeatmap,
            PanelData::LiveTradeSignal(_) => Panel::LiveTradeSignal,
            PanelData::HighVolume(_) => Panel::HighVolumeScanner,
            PanelData::VatScanner(_) => Panel::VatScanner,
            PanelData::McpStatus(_) => Panel::McpTradingPanel,
        }
    }

    /// One-line summary for logs.
    pub fn summary(&self) -> String {
        match self {
            PanelData::MarketIndices(r) => format!("{} indices", r.data.len()),
            PanelData::OptionChain(c) => format!(
                "{} strikes, spot {:?}, PCR {:?}",
                c.chain.len(),
                c.spot_price,
                c.pcr()
            ),
            PanelData::MarketState(a) => format!(
                "state {}, tradable {}",
                a.state.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
                a.is_tradable()
            ),
            PanelData::ActiveStrategy(r) => format!("{} tradable adjustments", r.tradable().len()),
            PanelData::StockAnalysis(r) => {
                format!("{} stocks, {} tradable", r.count, r.tradable_count)
            }
            PanelData::QuantDashboard(s) => format!(
                "VIX {:?}, PCR {:?}, {} section errors",
                s.vix.value,
                s.pcr.pcr,
                s.section_errors().len()
            ),
            PanelData::GreeksHeatmap(h) => format!(
                "{} strikes, max gamma at {:?}",
                h.heatmap.len(),
                h.max_gamma_row().map(|r| r.strike)
            ),
            PanelData::LiveTradeSignal(s) => {
                format!("{:?} on {}", s.trade_recommendation.action, s.symbol)
            }
            PanelData::HighVolume(r) => format!("{} high-volume stocks", r.high_volume_count),
            PanelData::VatScanner(v) => format!("{} VAT opportunities", v.total_opportunities),
            PanelData::McpStatus(s) => format!("{} ({} tools)", s.status, s.tools_count),
        }
    }
}

impl OptionGreekClient {
    /// Fetch the data behind a polled panel.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for [`Panel::RealTimeAlerts`], which is streamed.
    pub async fn fetch_panel(&self, panel: Panel, params: &PanelParams) -> Result<PanelData> {
        let symbol = params.symbol.as_str();
        Ok(match panel {
            Panel::MarketIndices => PanelData::MarketIndices(self.indices().await?),
            Panel::OptionChainTable => {
                PanelData::OptionChain(self.option_chain(symbol, params.strike_count).await?)
            }
            Panel::MarketStateDetector => PanelData::MarketState(self.market_state(symbol).await?),
            Panel::ActiveStrategy => PanelData::ActiveStrategy(self.adjustments(symbol).await?),
            Panel::StockAnalysis => {
                PanelData::StockAnalysis(self.scan_fno_stocks(&params.stock_scan).await?)
            }
            Panel::QuantDashboard => PanelData::QuantDashboard(self.nifty_sentiment().await?),
            Panel::GreeksHeatmap => PanelData::GreeksHeatmap(
                self.greeks_heatmap(symbol, params.heatmap_strikes).await?,
            ),
            Panel::LiveTradeSignal => {
                PanelData::LiveTradeSignal(self.live_trade_signal(symbol).await?)
            }
            Panel::HighVolumeScanner => {
                PanelData::HighVolume(self.high_volume_scan(&params.high_volume).await?)
            }
            Panel::VatScanner => PanelData::VatScanner(self.vat_scan(symbol).await?),
            Panel::McpTradingPanel => PanelData::McpStatus(self.mcp_status().await?),
            Panel::RealTimeAlerts => {
                return Err(OptionGreekError::InvalidArgument(format!(
                    "{panel} is streamed over the alerts WebSocket, not polled"
                )));
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Panel state
// ---------------------------------------------------------------------------

/// Published state of a polled panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    /// Last successfully fetched data.
    pub data: Option<PanelData>,
    /// Error of the latest fetch, cleared on the next success.
    pub error: Option<String>,
    /// Time of the last successful fetch.
    pub last_updated: Option<DateTime<Utc>>,
    /// A fetch is in flight.
    pub fetching: bool,
    /// Completed fetches, successful or not.
    pub fetch_count: u64,
}

impl PanelState {
    /// Showing data from before the latest failed fetch.
    pub fn is_stale(&self) -> bool {
        self.data.is_some() && self.error.is_some()
    }
}

// ---------------------------------------------------------------------------
// Poller
// ---------------------------------------------------------------------------

/// Spawns panel polling tasks.
pub struct PanelPoller;

impl PanelPoller {
    /// Start polling `panel` every `interval`. The first fetch happens
    /// immediately.
    pub fn spawn(
        client: OptionGreekClient,
        panel: Panel,
        params: PanelParams,
        interval: Duration,
    ) -> PanelHandle {
        let (tx, rx) = watch::channel(PanelState::default());
        let refresh = Arc::new(Notify::new());
        let interval = interval.max(Duration::from_millis(1));

        let task = tokio::spawn(poll_loop(client, panel, params, interval, tx, refresh.clone()));
        tracing::debug!(%panel, interval_ms = interval.as_millis() as u64, "Panel poller started");

        PanelHandle {
            panel,
            interval,
            state: rx,
            refresh,
            task,
        }
    }
}

async fn poll_loop(
    client: OptionGreekClient,
    panel: Panel,
    params: PanelParams,
    interval: Duration,
    tx: watch::Sender<PanelState>,
    refresh: Arc<Notify>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = refresh.notified() => {
                tracing::debug!(%panel, "Manual refresh");
                ticker.reset();
            }
        }

        tx.send_modify(|s| s.fetching = true);
        let result = client.fetch_panel(panel, &params).await;

        tx.send_modify(|s| {
            s.fetching = false;
            s.fetch_count += 1;
            match result {
                Ok(data) => {
                    tracing::trace!(%panel, summary = %data.summary(), "Panel updated");
                    s.data = Some(data);
                    s.error = None;
                    s.last_updated = Some(Utc::now());
                }
                Err(e) => {
                    tracing::warn!(%panel, error = %e, "Panel fetch failed");
                    s.error = Some(e.to_string());
                }
            }
        });

        if tx.is_closed() {
            tracing::debug!(%panel, "No panel state receivers left, stopping");
            return;
        }
    }
}

/// Handle to a running panel poller. Dropping it stops the poller.
#[derive(Debug)]
pub struct PanelHandle {
    panel: Panel,
    interval: Duration,
    state: watch::Receiver<PanelState>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PanelHandle {
    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Watch state changes.
    ///
    /// Every fetch publishes twice: once when it starts (`fetching` set) and
    /// once with its result. Use `wait_for(|s| s.data.is_some())` rather
    /// than a bare `changed()` to wait for the first data.
    pub fn state(&self) -> watch::Receiver<PanelState> {
        self.state.clone()
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Fetch now and restart the interval. A refresh requested mid-fetch runs
    /// right after it.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop polling. The last published state stays readable through
    /// receivers obtained from [`state`](Self::state).
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PanelHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
