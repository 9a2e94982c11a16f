//! MCP endpoints: tool manifest, tool calls, server status.
//!
//! Tools may place or cancel real orders through the backend's broker
//! session. This client passes calls through unchanged.

use crate::client::OptionGreekClient;
use crate::error::Result;
use crate::types::health::Health;
use crate::types::mcp::{BatchRequest, BatchResponse, McpConfig, McpStatus, McpToolsResponse, ToolCall, ToolResult};

impl OptionGreekClient {
    /// List available tools with their input schemas.
    ///
    /// **Endpoint:** `GET /api/v1/mcp/tools`
    pub async fn mcp_tools(&self) -> Result<McpToolsResponse> {
        self.get("/mcp/tools").await
    }

    /// Execute one tool call.
    ///
    /// A failing tool still answers `200 OK`; check
    /// [`ToolResult::is_error`].
    ///
    /// **Endpoint:** `POST /api/v1/mcp/call`
    pub async fn mcp_call(&self, call: &ToolCall) -> Result<ToolResult> {
        call.validate()?;
        self.post("/mcp/call", call).await
    }

    /// Execute up to 10 tool calls in one request. Results keep call order.
    ///
    /// **Endpoint:** `POST /api/v1/mcp/batch`
    pub async fn mcp_batch(&self, calls: &[ToolCall]) -> Result<BatchResponse> {
        let body = BatchRequest::new(calls)?;
        self.post("/mcp/batch", &body).await
    }

    /// MCP server status and broker authentication state.
    ///
    /// **Endpoint:** `GET /api/v1/mcp/status`
    pub async fn mcp_status(&self) -> Result<McpStatus> {
        self.get("/mcp/status").await
    }

    /// Configuration snippets for MCP clients.
    ///
    /// **Endpoint:** `GET /api/v1/mcp/config`
    pub async fn mcp_config(&self) -> Result<McpConfig> {
        self.get("/mcp/config").await
    }

    /// **Endpoint:** `GET /api/v1/mcp/health`
    pub async fn mcp_health(&self) -> Result<Health> {
        self.get("/mcp/health").await
    }
}
