//! Dashboard view switching and panel polling.
//!
//! The dashboard shows one [`View`] at a time. Switching views stops the
//! pollers of panels that leave the screen and starts pollers for the panels
//! that appear; panels shared by both views keep running untouched.
//!
//! ```no_run
//! use optiongreek::OptionGreekClient;
//! use optiongreek::dashboard::{Dashboard, Panel, PanelParams, View};
//!
//! # #[tokio::main]
//! # async fn main() -> optiongreek::Result<()> {
//! let client = OptionGreekClient::new()?;
//! let mut dashboard = Dashboard::new(client, PanelParams::default());
//! dashboard.switch_view(View::OptionChain);
//!
//! if let Some(handle) = dashboard.panel(Panel::OptionChainTable) {
//!     let mut state = handle.state();
//!     // `changed()` also fires when a fetch starts; wait for actual data.
//!     let snapshot = state.wait_for(|s| s.data.is_some()).await.ok();
//!     println!("{:?}", snapshot.and_then(|s| s.data.as_ref().map(|d| d.summary())));
//! }
//! # Ok(())
//! # }
//! ```

pub mod panel;
pub mod poller;

pub use panel::{Panel, PanelParams, View};
pub use poller::{PanelData, PanelHandle, PanelPoller, PanelState};

use std::collections::BTreeMap;
use std::time::Duration;

use crate::client::OptionGreekClient;
use crate::config::ClientConfig;

/// Active view plus the pollers of its panels.
#[derive(Debug)]
pub struct Dashboard {
    client: OptionGreekClient,
    params: PanelParams,
    intervals: BTreeMap<Panel, Duration>,
    view: Option<View>,
    pollers: BTreeMap<Panel, PanelHandle>,
}

impl Dashboard {
    /// Create an idle dashboard using each panel's default interval.
    pub fn new(client: OptionGreekClient, params: PanelParams) -> Self {
        Self {
            client,
            params,
            intervals: BTreeMap::new(),
            view: None,
            pollers: BTreeMap::new(),
        }
    }

    /// Create an idle dashboard with the symbol and polling overrides from
    /// `config`.
    pub fn from_config(client: OptionGreekClient, config: &ClientConfig) -> Self {
        let mut dashboard = Self::new(client, PanelParams::for_symbol(&config.default_symbol));
        dashboard.intervals = config.polling.clone();
        dashboard
    }

    /// Override the polling interval of `panel`. Applies the next time its
    /// poller starts.
    pub fn with_interval(mut self, panel: Panel, interval: Duration) -> Self {
        self.intervals.insert(panel, interval);
        self
    }

    pub fn interval_for(&self, panel: Panel) -> Duration {
        self.intervals
            .get(&panel)
            .copied()
            .unwrap_or_else(|| panel.default_interval())
    }

    pub fn view(&self) -> Option<View> {
        self.view
    }

    pub fn params(&self) -> &PanelParams {
        &self.params
    }

    /// Show `view`: stop pollers for panels not on it, start the missing
    /// ones. Must be called within a Tokio runtime.
    pub fn switch_view(&mut self, view: View) {
        let wanted: Vec<Panel> = view
            .panels()
            .iter()
            .copied()
            .filter(|p| !p.is_streaming())
            .collect();

        let before = self.pollers.len();
        self.pollers.retain(|panel, _| wanted.contains(panel));
        let stopped = before - self.pollers.len();

        let mut started = 0;
        for panel in wanted {
            if !self.pollers.contains_key(&panel) {
                self.start_poller(panel);
                started += 1;
            }
        }

        tracing::info!(
            from = ?self.view,
            to = %view,
            started,
            stopped,
            "Switched dashboard view"
        );
        self.view = Some(view);
    }

    /// Change the underlying and restart pollers of symbol-scoped panels.
    pub fn set_symbol(&mut self, symbol: impl Into<String>) {
        let symbol = symbol.into();
        if symbol == self.params.symbol {
            return;
        }
        tracing::info!(%symbol, "Dashboard symbol changed");
        self.params.symbol = symbol;

        let restart: Vec<Panel> = self
            .pollers
            .keys()
            .copied()
            .filter(|p| p.uses_symbol())
            .collect();
        for panel in restart {
            self.start_poller(panel);
        }
    }

    /// Handle of a running panel poller.
    pub fn panel(&self, panel: Panel) -> Option<&PanelHandle> {
        self.pollers.get(&panel)
    }

    /// Panels currently being polled.
    pub fn running_panels(&self) -> Vec<Panel> {
        self.pollers.keys().copied().collect()
    }

    /// Force an immediate refresh of every running panel.
    pub fn refresh_all(&self) {
        self.pollers.values().for_each(PanelHandle::refresh);
    }

    /// Stop all pollers and clear the active view.
    pub fn stop(&mut self) {
        self.pollers.clear();
        self.view = None;
    }

    /// Replaces (and thereby stops) any existing poller for `panel`.
    fn start_poller(&mut self, panel: Panel) {
        let handle = PanelPoller::spawn(
            self.client.clone(),
            panel,
            self.params.clone(),
            self.interval_for(panel),
        );
        self.pollers.insert(panel, handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dashboard() -> Dashboard {
        // Nothing listens on port 9; fetches fail but pollers still run.
        let client = OptionGreekClient::with_base_url("http://127.0.0.1:9").unwrap();
        Dashboard::new(client, PanelParams::default())
    }

    #[tokio::test]
    async fn switching_views_swaps_pollers() {
        let mut dash = dashboard();
        assert!(dash.running_panels().is_empty());

        dash.switch_view(View::Overview);
        assert_eq!(
            dash.running_panels(),
            vec![
                Panel::MarketIndices,
                Panel::MarketStateDetector,
                Panel::ActiveStrategy,
                Panel::QuantDashboard
            ]
        );

        dash.switch_view(View::Scanners);
        assert_eq!(
            dash.running_panels(),
            vec![Panel::StockAnalysis, Panel::HighVolumeScanner]
        );
        assert_eq!(dash.view(), Some(View::Scanners));

        dash.stop();
        assert!(dash.running_panels().is_empty());
        assert_eq!(dash.view(), None);
    }

    #[tokio::test]
    async fn interval_overrides() {
        let dash = dashboard().with_interval(Panel::VatScanner, Duration::from_secs(3));
        assert_eq!(dash.interval_for(Panel::VatScanner), Duration::from_secs(3));
        assert_eq!(dash.interval_for(Panel::MarketIndices), Duration::from_secs(5));

        let mut dash = dash;
        dash.switch_view(View::Signals);
        assert_eq!(
            dash.panel(Panel::VatScanner).unwrap().interval(),
            Duration::from_secs(3)
        );
    }

    #[tokio::test]
    async fn symbol_change_restarts_scoped_panels_only() {
        let mut dash = dashboard();
        dash.switch_view(View::Overview);
        let before: BTreeMap<Panel, _> = dash
            .running_panels()
            .into_iter()
            .map(|p| (p, dash.panel(p).unwrap().state()))
            .collect();

        dash.set_symbol("NSE:NIFTYBANK-INDEX");
        assert_eq!(dash.params().symbol, "NSE:NIFTYBANK-INDEX");
        assert_eq!(dash.running_panels().len(), 4);

        for (panel, old_state) in &before {
            let current = dash.panel(*panel).unwrap().state();
            assert_eq!(
                old_state.same_channel(&current),
                !panel.uses_symbol(),
                "{panel} restart mismatch"
            );
        }
        let kept = |dash: &Dashboard, panel: Panel| {
            before[&panel].same_channel(&dash.panel(panel).unwrap().state())
        };
        assert!(kept(&dash, Panel::MarketIndices));
        assert!(kept(&dash, Panel::QuantDashboard));
        assert!(!kept(&dash, Panel::MarketStateDetector));
        assert!(!kept(&dash, Panel::ActiveStrategy));

        // Same symbol again: nothing restarts.
        let state_rx = dash.panel(Panel::MarketStateDetector).unwrap().state();
        dash.set_symbol("NSE:NIFTYBANK-INDEX");
        assert!(state_rx.same_channel(&dash.panel(Panel::MarketStateDetector).unwrap().state()));
    }
}
