// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
//!
//! [`BridgeMcpServer`] — the rmcp [`ServerHandler`] implementation.
//!
//! Wraps a [`ToolRegistry`] and implements `tools/list`, `tools/call`,
//! `resources/list` and `resources/read`.  Lifecycle methods (initialize,
//! shutdown, ping) use the default rmcp implementations.
//!
//! Tool calls carry no session state of their own; the only state shared
//! between calls is the truncation configuration held by the tools.

use std::sync::Arc;

use cmdbridge_tools::{system_info, ToolCall, ToolRegistry};
use rmcp::{
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParams, CallToolResult, ListResourcesResult,
        ListToolsResult, PaginatedRequestParams, RawResource, ReadResourceRequestParams,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    ErrorData as McpError,
};
use tracing::debug;
use uuid::Uuid;

use crate::bridge::{output_to_call_result, schema_to_mcp_tool};

/// URI of the host description resource.
pub const SYSTEM_INFO_URI: &str = "system://info";

const INSTRUCTIONS: &str = "Runs shell commands and scripts on this host and lists \
directories. Long output is truncated; use configure_output_truncation to change \
the limits. Read system://info for the host's platform and environment.";

/// MCP server wrapping a [`ToolRegistry`].
///
/// Create with [`BridgeMcpServer::new`] and then call
/// [`rmcp::ServiceExt::serve`] to start serving on a transport.
#[derive(Clone)]
pub struct BridgeMcpServer {
    registry: Arc<ToolRegistry>,
}

impl BridgeMcpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    fn resource_list() -> Vec<rmcp::model::Resource> {
        let mut raw = RawResource::new(SYSTEM_INFO_URI, "system-info");
        raw.description = Some("Platform, environment and key variables of the host".into());
        raw.mime_type = Some("text/plain".into());
        vec![raw.no_annotation()]
    }
}

impl ServerHandler for BridgeMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            instructions: Some(INSTRUCTIONS.into()),
            ..ServerInfo::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let registry = self.registry.clone();
        async move {
            let tools = registry
                .schemas()
                .into_iter()
                .map(schema_to_mcp_tool)
                .collect();
            Ok(ListToolsResult {
                tools,
                next_cursor: None,
                meta: None,
            })
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let args = request
            .arguments
            .map(|m| serde_json::Value::Object(m.into_iter().collect()))
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let call = ToolCall {
            id: Uuid::new_v4().to_string(),
            name: request.name.to_string(),
            args,
        };
        debug!(tool = %call.name, id = %call.id, "tool call");

        let output = self.registry.execute(&call).await;
        Ok(output_to_call_result(output))
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: Self::resource_list(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        match request.uri.as_str() {
            SYSTEM_INFO_URI => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(system_info(), SYSTEM_INFO_URI)],
            }),
            other => Err(McpError::resource_not_found(
                format!("unknown resource URI: {other}"),
                None,
            )),
        }
    }
}

// ─── Unit tests ───────────────────────────────────────────────────────────────
//
// Full list/call/read round-trips are covered by tests/integration.rs.
