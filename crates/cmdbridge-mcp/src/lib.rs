// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! `cmdbridge-mcp` — MCP (Model Context Protocol) server for cmdbridge.
//!
//! Exposes the command tools to any MCP-compatible host over **stdio**
//! transport using line-delimited JSON-RPC.
//!
//! # Quick start
//!
//! ```text
//! cmdbridge serve
//! ```
//!
//! # MCP client configuration (`mcp.json`)
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "cmdbridge": {
//!       "command": "cmdbridge",
//!       "args": ["serve"]
//!     }
//!   }
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! MCP client
//!       │  stdin/stdout (line-delimited JSON-RPC)
//!       ▼
//! BridgeMcpServer (rmcp ServerHandler)
//!       │
//!       ▼
//! ToolRegistry  ──►  Tool::execute()  ──►  Truncator
//! ```

pub mod bridge;
pub mod registry;
pub mod server;

pub use registry::{build_mcp_registry, DEFAULT_TOOL_NAMES};
pub use server::{BridgeMcpServer, SYSTEM_INFO_URI};

use std::sync::Arc;

use anyhow::Result;
use cmdbridge_tools::ToolRegistry;
use rmcp::ServiceExt;
use tracing::info;

/// Serve the tools in `registry` on `stdin` / `stdout` until the client
/// disconnects (stdin EOF) or the process is terminated.
///
/// # Errors
///
/// Returns an error if the rmcp transport fails to initialize or if the
/// server encounters a fatal I/O error.
pub async fn serve_stdio(registry: Arc<ToolRegistry>) -> Result<()> {
    info!(tools = ?registry.names(), "serving MCP on stdio");
    let server = BridgeMcpServer::new(registry);
    let running = server
        .serve((tokio::io::stdin(), tokio::io::stdout()))
        .await
        .map_err(|e| anyhow::anyhow!("MCP server init error: {e}"))?;
    running
        .waiting()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server error: {e}"))?;
    info!("MCP client disconnected");
    Ok(())
}
