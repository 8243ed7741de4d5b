//! MCP request dispatch

use super::codec::{Codec, JsonCodec};
use super::messages::*;
use crate::error::{ProtocolError, ServerError, ToolError};
use crate::tools::ToolRegistry;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

/// MCP protocol revision implemented here
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// Trait for handling messages
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle one request. Notifications produce no response.
    async fn handle_message(&self, request: McpRequest) -> Option<McpResponse>;

    /// Decode and handle one raw frame
    async fn handle_frame(&self, data: &[u8]) -> Option<McpResponse>;

    fn codec(&self) -> &dyn Codec;
}

#[derive(Debug, Clone, Serialize)]
struct ServerInfo {
    name: String,
    version: String,
}

/// Routes MCP methods to the tool registry
pub struct McpHandler {
    registry: ToolRegistry,
    codec: JsonCodec,
    server_info: ServerInfo,
}

impl McpHandler {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            codec: JsonCodec::default(),
            server_info: ServerInfo {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    pub fn with_max_message_size(mut self, max_size: usize) -> Self {
        self.codec = JsonCodec::new(max_size);
        self
    }

    fn handle_initialize(&self, id: Option<Value>) -> McpResponse {
        McpResponse::success(
            id,
            json!({
                "protocolVersion": MCP_PROTOCOL_VERSION,
                "serverInfo": self.server_info,
                "capabilities": {
                    "tools": {}
                }
            }),
        )
    }

    fn handle_list_tools(&self, id: Option<Value>) -> McpResponse {
        let tools: Vec<&_> = self.registry.descriptors().collect();
        McpResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Value) -> McpResponse {
        let name = match params.get("name").and_then(Value::as_str) {
            Some(name) => name,
            None => return McpResponse::error(id, INVALID_PARAMS, "Missing tool name"),
        };

        let arguments = params.get("arguments").cloned().unwrap_or(Value::Null);

        match self.registry.call(name, arguments).await {
            Ok(output) => McpResponse::success(
                id,
                json!({
                    "content": [{
                        "type": "text",
                        "text": output.text
                    }],
                    "isError": output.is_error
                }),
            ),
            Err(ServerError::Tool(e @ ToolError::UnknownTool(_)))
            | Err(ServerError::Tool(e @ ToolError::InvalidArguments(_))) => {
                warn!("Rejected tool call: {}", e);
                McpResponse::error(id, INVALID_PARAMS, e.to_string())
            }
            Err(e) => {
                error!("Tool call failed: {}", e);
                McpResponse::error(id, SERVER_ERROR, e.to_string())
            }
        }
    }
}

#[async_trait]
impl MessageHandler for McpHandler {
    async fn handle_message(&self, request: McpRequest) -> Option<McpResponse> {
        debug!("Handling method: {}", request.method);

        if request.is_notification() {
            debug!("Notification received: {}", request.method);
            return None;
        }

        let id = request.id;
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => McpResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            other => McpResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {}", other)),
        };

        Some(response)
    }

    async fn handle_frame(&self, data: &[u8]) -> Option<McpResponse> {
        match self.codec.decode(data) {
            Ok(request) => self.handle_message(request).await,
            Err(ServerError::Protocol(ProtocolError::ParseError(msg))) => {
                warn!("Unparsable message: {}", msg);
                Some(McpResponse::error(None, PARSE_ERROR, format!("Parse error: {}", msg)))
            }
            Err(e) => {
                warn!("Rejected message: {}", e);
                Some(McpResponse::error(None, INVALID_REQUEST, e.to_string()))
            }
        }
    }

    fn codec(&self) -> &dyn Codec {
        &self.codec
    }
}
