//! Reconnecting WebSocket client for the market and alerts channels.
//!
//! A [`WsClient`] owns one background Tokio task per connection. The task
//! connects, replays the tracked subscriptions, then reads frames and sends
//! heartbeats until the socket drops. It reconnects with exponential backoff
//! until [`WsConfig::max_reconnect_attempts`] consecutive attempts have
//! failed, at which point the status becomes [`ConnectionStatus::Failed`] and
//! the task exits.
//!
//! ```no_run
//! use optiongreek::ws::client::{WsClient, WsConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> optiongreek::Result<()> {
//! let (client, mut rx) = WsClient::spawn(WsConfig::new("ws://localhost:8000/api/v1/ws/market"));
//! client.subscribe(["NSE:NIFTY50-INDEX"])?;
//!
//! while let Some(msg) = rx.recv().await {
//!     if let Some(tick) = msg.as_tick() {
//!         println!("{:?} {:?}", tick.symbol, tick.ltp);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::constants::websocket;
use crate::error::{OptionGreekError, Result};
use crate::ws::messages::{ClientAction, ServerMessage};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WriterHalf = futures_util::stream::SplitSink<Socket, Message>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a [`WsClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WsConfig {
    /// Full WebSocket URL (`ws://` or `wss://`).
    pub url: String,
    /// Consecutive failed attempts before giving up.
    pub max_reconnect_attempts: u32,
    /// Delay before the first reconnect attempt.
    pub initial_backoff: Duration,
    /// Cap on the reconnect delay.
    pub max_backoff: Duration,
    /// Interval between `ping` actions.
    pub heartbeat: Duration,
    /// Capacity of the message channel handed to the caller.
    pub channel_capacity: usize,
}

impl WsConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_reconnect_attempts: websocket::MAX_RECONNECT_ATTEMPTS,
            initial_backoff: Duration::from_millis(websocket::INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(websocket::MAX_BACKOFF_MS),
            heartbeat: Duration::from_secs(websocket::HEARTBEAT_SECS),
            channel_capacity: websocket::CHANNEL_CAPACITY,
        }
    }

    /// Default: 5.
    pub fn max_reconnect_attempts(mut self, n: u32) -> Self {
        self.max_reconnect_attempts = n;
        self
    }

    /// Default: 1 s.
    pub fn initial_backoff(mut self, delay: Duration) -> Self {
        self.initial_backoff = delay;
        self
    }

    /// Default: 30 s.
    pub fn max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = delay;
        self
    }

    /// Default: 30 s. Zero is treated as one millisecond.
    pub fn heartbeat(mut self, interval: Duration) -> Self {
        self.heartbeat = interval;
        self
    }

    /// Default: 1,024.
    pub fn channel_capacity(mut self, cap: usize) -> Self {
        self.channel_capacity = cap.max(1);
        self
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: self.max_reconnect_attempts,
            initial: self.initial_backoff,
            max: self.max_backoff,
        }
    }
}

// ---------------------------------------------------------------------------
// Reconnect policy
// ---------------------------------------------------------------------------

/// Exponential backoff: `initial * 2^(attempt - 1)`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub initial: Duration,
    pub max: Duration,
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(31);
        self.initial.saturating_mul(1u32 << shift).min(self.max)
    }

    /// Whether `attempt` is past the allowed number of attempts.
    pub fn exhausted(&self, attempt: u32) -> bool {
        attempt > self.max_attempts
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Connection state published by the background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    /// Waiting `delay` before reconnect attempt `attempt`.
    Reconnecting { attempt: u32, delay: Duration },
    /// Closed by [`WsClient::shutdown`] or because the receiver was dropped.
    Disconnected,
    /// Gave up after `attempts` consecutive failed reconnects.
    Failed { attempts: u32 },
}

impl ConnectionStatus {
    /// No further connection attempts will be made.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disconnected | Self::Failed { .. })
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    /// Replays `{"action":"subscribe","symbols":[...]}` on connect.
    Market,
    /// Sends a bare `{"action":"subscribe"}` on connect.
    Alerts,
}

#[derive(Debug)]
enum Command {
    Send(ClientAction),
    Shutdown,
}

/// Handle to a reconnecting WebSocket connection.
///
/// Dropping the handle stops the background task.
#[derive(Debug)]
pub struct WsClient {
    commands: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<ConnectionStatus>,
    subscribed: Arc<Mutex<BTreeSet<String>>>,
    task: Option<JoinHandle<()>>,
}

impl WsClient {
    /// Spawn a market-data connection.
    ///
    /// Symbols added with [`subscribe`](Self::subscribe) are replayed after
    /// every reconnect. While the receiver is full, incoming ticks are
    /// dropped; other messages are held until there is room.
    pub fn spawn(config: WsConfig) -> (Self, mpsc::Receiver<ServerMessage>) {
        Self::spawn_channel(config, Channel::Market)
    }

    /// Spawn an alerts connection. Subscribes on every connect.
    pub fn spawn_alerts(config: WsConfig) -> (Self, mpsc::Receiver<ServerMessage>) {
        Self::spawn_channel(config, Channel::Alerts)
    }

    fn spawn_channel(config: WsConfig, channel: Channel) -> (Self, mpsc::Receiver<ServerMessage>) {
        let (msg_tx, msg_rx) = mpsc::channel(config.channel_capacity.max(1));
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(ConnectionStatus::Connecting);
        let subscribed = Arc::new(Mutex::new(BTreeSet::new()));

        let conn = Connection {
            config,
            channel,
            messages: msg_tx,
            status: status_tx,
            commands: cmd_rx,
            subscribed: subscribed.clone(),
            dropped_ticks: 0,
        };
        let task = tokio::spawn(conn.run());

        let client = Self {
            commands: cmd_tx,
            status: status_rx,
            subscribed,
            task: Some(task),
        };
        (client, msg_rx)
    }

    /// Subscribe to symbols. Already-tracked symbols are skipped.
    ///
    /// The subscription is tracked even while disconnected and sent on the
    /// next connect.
    pub fn subscribe<I, S>(&self, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let added: Vec<String> = {
            let mut set = self.lock_subscribed();
            symbols
                .into_iter()
                .map(Into::into)
                .filter(|s| set.insert(s.clone()))
                .collect()
        };
        if added.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = added.len(), "Subscribing symbols");
        self.send(Command::Send(ClientAction::subscribe(added)))
    }

    /// Unsubscribe from symbols. Untracked symbols are skipped.
    pub fn unsubscribe<I, S>(&self, symbols: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let removed: Vec<String> = {
            let mut set = self.lock_subscribed();
            symbols
                .into_iter()
                .map(Into::into)
                .filter(|s| set.remove(s))
                .collect()
        };
        if removed.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = removed.len(), "Unsubscribing symbols");
        self.send(Command::Send(ClientAction::unsubscribe(removed)))
    }

    /// Watch connection status changes.
    pub fn status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }

    /// Current connection status.
    pub fn current_status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    /// Wait until the socket is connected.
    ///
    /// # Errors
    ///
    /// [`OptionGreekError::ReconnectExhausted`] if the client gave up, and
    /// [`OptionGreekError::ChannelClosed`] if it was stopped.
    pub async fn connected(&self) -> Result<()> {
        let mut status = self.status.clone();
        let reached = status
            .wait_for(|s| *s == ConnectionStatus::Connected || s.is_terminal())
            .await
            .map(|s| *s);
        match reached {
            Ok(ConnectionStatus::Connected) => Ok(()),
            Ok(ConnectionStatus::Failed { attempts }) => {
                Err(OptionGreekError::ReconnectExhausted { attempts })
            }
            _ => Err(OptionGreekError::ChannelClosed),
        }
    }

    /// Tracked symbols, sorted.
    pub fn subscribed(&self) -> Vec<String> {
        self.lock_subscribed().iter().cloned().collect()
    }

    /// Close the socket and wait for the background task to finish.
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "WebSocket task ended abnormally");
            }
        }
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.commands
            .send(cmd)
            .map_err(|_| OptionGreekError::ChannelClosed)
    }

    fn lock_subscribed(&self) -> std::sync::MutexGuard<'_, BTreeSet<String>> {
        self.subscribed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for WsClient {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ---------------------------------------------------------------------------
// Background task
// ---------------------------------------------------------------------------

/// Why a connected session ended.
enum SessionEnd {
    /// Socket closed or errored; reconnect.
    Lost,
    /// Shutdown requested, every handle dropped, or the receiver dropped.
    Stopped,
}

struct Connection {
    config: WsConfig,
    channel: Channel,
    messages: mpsc::Sender<ServerMessage>,
    status: watch::Sender<ConnectionStatus>,
    commands: mpsc::UnboundedReceiver<Command>,
    subscribed: Arc<Mutex<BTreeSet<String>>>,
    dropped_ticks: u64,
}

impl Connection {
    async fn run(mut self) {
        let policy = self.config.reconnect_policy();
        let url = self.config.url.clone();
        let mut attempt = 0u32;

        loop {
            match connect_async(url.as_str()).await {
                Ok((ws, _resp)) => {
                    attempt = 0;
                    self.status.send_replace(ConnectionStatus::Connected);
                    tracing::info!(%url, channel = ?self.channel, "WebSocket connected");

                    match self.session(ws).await {
                        SessionEnd::Stopped => {
                            self.status.send_replace(ConnectionStatus::Disconnected);
                            tracing::info!(%url, "WebSocket client stopped");
                            return;
                        }
                        SessionEnd::Lost => {
                            tracing::warn!(%url, "WebSocket connection lost");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(%url, attempt, error = %e, "WebSocket connect failed");
                }
            }

            attempt += 1;
            if policy.exhausted(attempt) {
                tracing::error!(%url, attempts = policy.max_attempts, "Giving up on WebSocket reconnect");
                self.status.send_replace(ConnectionStatus::Failed {
                    attempts: policy.max_attempts,
                });
                return;
            }

            let delay = policy.delay(attempt);
            self.status
                .send_replace(ConnectionStatus::Reconnecting { attempt, delay });
            tracing::info!(
                %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Reconnecting..."
            );

            if !self.backoff(delay).await {
                self.status.send_replace(ConnectionStatus::Disconnected);
                return;
            }
            self.status.send_replace(ConnectionStatus::Connecting);
        }
    }

    /// Sleep for `delay` while still honouring shutdown. Subscription
    /// commands received meanwhile are already tracked and replayed on
    /// connect. Returns `false` if the client should stop.
    async fn backoff(&mut self, delay: Duration) -> bool {
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return true,
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Send(_)) => {}
                    Some(Command::Shutdown) | None => return false,
                },
            }
        }
    }

    async fn session(&mut self, ws: Socket) -> SessionEnd {
        let (mut write, mut read) = ws.split();

        if let Some(action) = self.on_connect_action() {
            if let Err(e) = send_action(&mut write, &action).await {
                tracing::error!(error = %e, "Failed to resubscribe after connect");
                return SessionEnd::Lost;
            }
        }

        let period = self.config.heartbeat.max(Duration::from_millis(1));
        let mut heartbeat = tokio::time::interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => match ServerMessage::parse(&text) {
                        Ok(msg) => {
                            if !self.deliver(msg).await {
                                tracing::debug!("Message receiver dropped");
                                let _ = write.send(Message::Close(None)).await;
                                return SessionEnd::Stopped;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to parse server message");
                        }
                    },
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("WebSocket closed by server");
                        return SessionEnd::Lost;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "WebSocket error");
                        return SessionEnd::Lost;
                    }
                    None => {
                        tracing::info!("WebSocket stream ended");
                        return SessionEnd::Lost;
                    }
                },
                cmd = self.commands.recv() => match cmd {
                    Some(Command::Send(action)) => {
                        if let Err(e) = send_action(&mut write, &action).await {
                            tracing::error!(error = %e, "Failed to send action");
                            return SessionEnd::Lost;
                        }
                    }
                    Some(Command::Shutdown) | None => {
                        let _ = write.send(Message::Close(None)).await;
                        return SessionEnd::Stopped;
                    }
                },
                _ = heartbeat.tick() => {
                    if let Err(e) = send_action(&mut write, &ClientAction::Ping).await {
                        tracing::warn!(error = %e, "Heartbeat failed");
                        return SessionEnd::Lost;
                    }
                }
            }
        }
    }

    /// Forward `msg` to the receiver. Returns `false` once it is gone.
    ///
    /// Ticks are dropped while the channel is full so a lagging consumer
    /// cannot stall heartbeats or queued commands. Other messages wait for
    /// room.
    async fn deliver(&mut self, msg: ServerMessage) -> bool {
        match self.messages.try_send(msg) {
            Ok(()) => true,
            Err(TrySendError::Full(ServerMessage::MarketUpdate { .. })) => {
                self.dropped_ticks += 1;
                if self.dropped_ticks % 1_000 == 1 {
                    tracing::warn!(dropped = self.dropped_ticks, "Receiver lagging, dropping ticks");
                }
                true
            }
            Err(TrySendError::Full(msg)) => self.messages.send(msg).await.is_ok(),
            Err(TrySendError::Closed(_)) => false,
        }
    }

    fn on_connect_action(&self) -> Option<ClientAction> {
        match self.channel {
            Channel::Alerts => Some(ClientAction::subscribe_alerts()),
            Channel::Market => {
                let symbols: Vec<String> = self
                    .subscribed
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .iter()
                    .cloned()
                    .collect();
                (!symbols.is_empty()).then(|| ClientAction::subscribe(symbols))
            }
        }
    }
}

async fn send_action(write: &mut WriterHalf, action: &ClientAction) -> Result<()> {
    let json = serde_json::to_string(action)?;
    write.send(Message::Text(json.into())).await?;
    Ok(())
}
