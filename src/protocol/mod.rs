//! Model Context Protocol: JSON-RPC messages, framing and dispatch

pub mod codec;
pub mod handler;
pub mod messages;
pub mod transport;

pub use codec::{Codec, JsonCodec};
pub use handler::{McpHandler, MessageHandler, MCP_PROTOCOL_VERSION};
pub use messages::{McpError, McpRequest, McpResponse};
pub use transport::{serve_lines, serve_stdio};
