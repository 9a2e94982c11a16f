//! Health endpoints: liveness and readiness.

use crate::client::OptionGreekClient;
use crate::error::Result;
use crate::types::health::{Health, Readiness};

impl OptionGreekClient {
    /// Liveness probe.
    ///
    /// **Endpoint:** `GET /api/v1/health`
    pub async fn health(&self) -> Result<Health> {
        self.get("/health").await
    }

    /// Readiness probe with per-dependency state.
    ///
    /// **Endpoint:** `GET /api/v1/ready`
    pub async fn readiness(&self) -> Result<Readiness> {
        self.get("/ready").await
    }
}
