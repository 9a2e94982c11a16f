//! Request and response types for the OptionGreek API.
//!
//! The backend is loosely typed: most numeric fields may be missing or
//! `null`, and several routes report failures inside a `200 OK` body. Every
//! optional field here deserializes from both.
//!
//! ## Organization
//!
//! - [`enums`]: Shared enumerations (option type, market state, time window, ...)
//! - [`option_chain`]: Option chain rows, quotes, Greeks, moneyness helpers
//! - [`market`]: Spot price, index quotes, OHLCV history
//! - [`analysis`]: Market-state analysis, structure analysis, adjustments
//! - [`scanner`]: F&O stock scan, high-volume scan, bulk OC analysis
//! - [`signal`]: Live trade signal, OI/Greeks/breakout analysis, recommendations
//! - [`sentiment`]: Nifty sentiment dashboard (VIX, PCR, breadth, levels)
//! - [`heatmap`]: Strike-wise Greeks heatmap
//! - [`strategies`]: Value Adjustment Theory scan
//! - [`mcp`]: MCP tool manifest, calls and status
//! - [`auth`]: Authentication status and flows
//! - [`health`]: Liveness and readiness
//!
//! All enums are re-exported at the module root via `pub use enums::*`.

pub mod analysis;
pub mod auth;
pub mod enums;
pub mod health;
pub mod heatmap;
pub mod market;
pub mod mcp;
pub mod option_chain;
pub mod scanner;
pub mod sentiment;
pub mod signal;
pub mod strategies;

pub use enums::*;

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as `T::default()`.
///
/// Combine with `#[serde(default)]` so a missing field behaves the same.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `backend_error` for bodies shaped `{"success": bool, "error": str}`.
pub(crate) fn success_flag_error(success: bool, error: Option<&str>, what: &str) -> Option<String> {
    match (success, error) {
        (_, Some(msg)) if !msg.is_empty() => Some(msg.to_owned()),
        (false, _) => Some(format!("{what} failed")),
        _ => None,
    }
}
