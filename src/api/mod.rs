//! REST API endpoint implementations.
//!
//! Each sub-module adds high-level `async` methods to
//! [`OptionGreekClient`](crate::client::OptionGreekClient) via `impl` blocks.
//! Request limits the backend enforces (bulk size, scan limits, heatmap
//! strikes) are checked locally first and fail with
//! [`OptionGreekError::InvalidArgument`](crate::error::OptionGreekError::InvalidArgument)
//! without touching the network.
//!
//! ## Usage
//!
//! ```no_run
//! use optiongreek::OptionGreekClient;
//!
//! # #[tokio::main]
//! # async fn main() -> optiongreek::Result<()> {
//! let client = OptionGreekClient::new()?;
//! let chain = client.option_chain("NSE:NIFTY50-INDEX", 10).await?;
//! let state = client.market_state("NSE:NIFTY50-INDEX").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! | Module | Endpoints | Description |
//! |---|---|---|
//! | [`health`] | 2 | Liveness, readiness |
//! | [`auth`] | 6 | Broker login URL, token status/refresh, auth code exchange |
//! | [`market`] | 11 | Spot, state, indices, history, scanners, sentiment, signals, heatmap |
//! | [`options`] | 3 | Option chain, structure analysis, adjustments |
//! | [`strategies`] | 1 | VAT scan |
//! | [`mcp`] | 6 | AI-agent tool manifest, calls, status |

pub mod auth;
pub mod health;
pub mod market;
pub mod mcp;
pub mod options;
pub mod strategies;
