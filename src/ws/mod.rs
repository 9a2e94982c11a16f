//! WebSocket modules for real-time data streaming.
//!
//! The backend exposes two JSON WebSocket endpoints:
//!
//! ## `/api/v1/ws/market`: Live Market Updates
//!
//! Clients send `{"action": "subscribe" | "unsubscribe", "symbols": [...]}`
//! and `{"action": "ping"}`. The server relays broker ticks as
//! `{"type": "market_update", "data": {...}}` and acknowledges subscription
//! changes with `subscription_status`.
//!
//! ## `/api/v1/ws/alerts`: Order & Trade Alerts
//!
//! Clients send a bare `{"action": "subscribe"}`; the server replies with
//! `{"type": "subscription_status", "channel": "alerts", "status": "active"}`
//! and then pushes `{"type": "alert", "data": {...}}`.
//!
//! ## Usage
//!
//! [`client::WsClient`] handles both: it reconnects with exponential
//! backoff, replays subscriptions after each reconnect, sends heartbeats and
//! publishes its [`client::ConnectionStatus`] on a `watch` channel.
//! Messages arrive on a bounded `mpsc` receiver.

pub mod client;
pub mod messages;
