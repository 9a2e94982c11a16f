//! # optiongreek
//!
//! A Rust client for the OptionGreek market dashboard backend: option
//! chains with Greeks, market-state analysis, scanners, live trade signals,
//! MCP tool calls, and the live market/alerts WebSocket feeds.
//!
//! ## Quick Start
//!
//! ```no_run
//! use optiongreek::OptionGreekClient;
//!
//! #[tokio::main]
//! async fn main() -> optiongreek::Result<()> {
//!     let client = OptionGreekClient::with_base_url("http://localhost:8000")?;
//!     let chain = client.option_chain("NSE:NIFTY50-INDEX", 10).await?;
//!     println!("PCR {:?}", chain.pcr());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`client`]: REST transport, error mapping, bearer token
//! - [`api`]: Typed endpoint methods on [`OptionGreekClient`]
//! - [`types`]: Request and response types
//! - [`ws`]: Reconnecting WebSocket client for market ticks and alerts
//! - [`dashboard`]: Views, panels and their pollers
//! - [`config`]: TOML and environment configuration

pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod types;
pub mod ws;

/// Re-export the main client type at crate root for convenience.
pub use client::OptionGreekClient;
/// Re-export the error type and Result alias.
pub use error::{OptionGreekError, Result};
