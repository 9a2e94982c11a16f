//! Watch a dashboard view from the terminal: polls the view's panels,
//! streams market ticks for the configured symbol and order/trade alerts,
//! and logs every update for a bounded time.
//!
//! # Usage
//!
//! ```sh
//! export OPTIONGREEK_API_URL="http://localhost:8000"
//! cargo run --bin og_watch --features cli -- [--config og.toml] [--view overview] [--secs 60]
//! ```
//!
//! Views: `overview`, `option_chain`, `signals`, `scanners`, `agent`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use optiongreek::OptionGreekClient;
use optiongreek::config::ClientConfig;
use optiongreek::constants::{WS_ALERTS_PATH, WS_MARKET_PATH};
use optiongreek::dashboard::{Dashboard, View};
use optiongreek::error::Result;
use optiongreek::ws::client::WsClient;
use optiongreek::ws::messages::ServerMessage;
use tokio::time;

#[derive(Parser, Debug)]
#[command(name = "og_watch", about = "Watch an OptionGreek dashboard view and live feeds")]
struct Cli {
    /// TOML config file. `OPTIONGREEK_*` variables override it.
    #[arg(long, env = "OPTIONGREEK_CONFIG")]
    config: Option<PathBuf>,

    /// Dashboard view to poll.
    #[arg(long, default_value = "overview")]
    view: View,

    /// Seconds to run before shutting down.
    #[arg(long, default_value_t = 60)]
    secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    config.apply_env()?;

    let client = OptionGreekClient::from_config(&config)?;
    match client.health().await {
        Ok(h) => tracing::info!(status = %h.status, service = %h.service, "Backend reachable"),
        Err(e) => tracing::warn!(error = %e, "Health check failed, continuing"),
    }

    let mut dashboard = Dashboard::from_config(client, &config);
    dashboard.switch_view(args.view);

    let (market, mut ticks) = WsClient::spawn(config.ws_config(WS_MARKET_PATH)?);
    market.subscribe([config.default_symbol.clone()])?;
    let (alerts, mut alert_rx) = WsClient::spawn_alerts(config.ws_config(WS_ALERTS_PATH)?);

    let mut panel_updates: Vec<_> = dashboard
        .running_panels()
        .into_iter()
        .filter_map(|p| dashboard.panel(p).map(|h| (p, h.state())))
        .collect();

    tracing::info!(view = %args.view, secs = args.secs, "Watching");
    let deadline = time::sleep(Duration::from_secs(args.secs));
    tokio::pin!(deadline);
    let mut report = time::interval(Duration::from_secs(5));

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            msg = ticks.recv() => match msg {
                Some(ServerMessage::MarketUpdate { data }) => {
                    tracing::info!(symbol = ?data.symbol, ltp = ?data.ltp, chp = ?data.chp, "Tick");
                }
                Some(other) => tracing::debug!(?other, "Market channel"),
                None => {
                    tracing::warn!(status = ?market.current_status(), "Market feed ended");
                    break;
                }
            },
            msg = alert_rx.recv() => match msg {
                Some(ServerMessage::Alert { data }) => tracing::info!(%data, "Alert"),
                Some(other) => tracing::debug!(?other, "Alerts channel"),
                None => {
                    tracing::warn!(status = ?alerts.current_status(), "Alerts feed ended");
                    break;
                }
            },
            _ = report.tick() => {
                for (panel, state) in &mut panel_updates {
                    if !state.has_changed().unwrap_or(false) {
                        continue;
                    }
                    let s = state.borrow_and_update();
                    match (&s.data, &s.error) {
                        (_, Some(err)) => tracing::warn!(%panel, stale = s.is_stale(), error = %err, "Panel error"),
                        (Some(data), None) => tracing::info!(%panel, summary = %data.summary(), "Panel"),
                        (None, None) => {}
                    }
                }
            }
        }
    }

    dashboard.stop();
    market.shutdown().await;
    alerts.shutdown().await;
    tracing::info!("Done");
    Ok(())
}
