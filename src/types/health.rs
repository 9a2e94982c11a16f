//! Liveness and readiness.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Response from `GET /health` and `GET /mcp/health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Health {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub service: String,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Response from `GET /ready`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Readiness {
    #[serde(default)]
    pub status: String,
    /// Dependency name → state (`"pending"`, `"connected"`, ...).
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }

    /// Dependencies not yet connected.
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.dependencies
            .iter()
            .filter(|(_, state)| state.as_str() != "connected")
            .map(|(name, _)| name.as_str())
    }
}
