#![allow(missing_docs)]
//! MCP (Model Context Protocol) pass-through types.
//!
//! The backend exposes its trading tools over plain HTTP in the MCP
//! `tools/list` / `tools/call` shapes. Tool arguments and schemas are
//! opaque JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::limits;
use crate::error::{OptionGreekError, Result};

// ---------------------------------------------------------------------------
// Tool manifest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema of the tool's arguments.
    #[serde(rename = "inputSchema", default)]
    pub input_schema: serde_json::Value,
}

/// Response from `GET /mcp/tools`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct McpToolsResponse {
    #[serde(default)]
    pub tools: Vec<McpTool>,
}

impl McpToolsResponse {
    pub fn find(&self, name: &str) -> Option<&McpTool> {
        self.tools.iter().find(|t| t.name == name)
    }
}

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// A single tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Call with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_arguments(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(OptionGreekError::InvalidArgument(
                "tool name is required".into(),
            ));
        }
        Ok(())
    }
}

/// Body of `POST /mcp/batch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRequest<'a> {
    pub calls: &'a [ToolCall],
}

impl<'a> BatchRequest<'a> {
    pub fn new(calls: &'a [ToolCall]) -> Result<Self> {
        if calls.is_empty() {
            return Err(OptionGreekError::InvalidArgument(
                "no tool calls provided".into(),
            ));
        }
        if calls.len() > limits::MAX_MCP_BATCH {
            return Err(OptionGreekError::InvalidArgument(format!(
                "maximum {} calls per batch, got {}",
                limits::MAX_MCP_BATCH,
                calls.len()
            )));
        }
        calls.iter().try_for_each(ToolCall::validate)?;
        Ok(Self { calls })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolContent {
    /// Content kind; the backend only emits `"text"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

/// Result of a tool call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToolResult {
    #[serde(default)]
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolResult {
    /// All text content joined with newlines.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|c| c.kind == "text")
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse the text content as JSON. Most tools return a JSON document.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.text())?)
    }
}

/// Response from `POST /mcp/batch`, in call order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchResponse {
    #[serde(default)]
    pub results: Vec<ToolResult>,
}

// ---------------------------------------------------------------------------
// Status & config
// ---------------------------------------------------------------------------

/// Response from `GET /mcp/status`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct McpStatus {
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub version: String,
    /// `"online"` when the server is up.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub authenticated: bool,
    /// Broker account name when authenticated.
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub tools_count: u32,
}

impl McpStatus {
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }
}

/// Response from `GET /mcp/config`: ready-made snippets for MCP clients.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct McpConfig {
    #[serde(default)]
    pub server_url: String,
    /// Client name → configuration document.
    #[serde(default)]
    pub configurations: HashMap<String, serde_json::Value>,
    /// Client name → setup steps.
    #[serde(default)]
    pub instructions: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub test_command: Option<String>,
}
