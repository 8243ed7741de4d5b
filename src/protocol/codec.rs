//! Line-oriented JSON codec with size guards

use super::messages::{McpRequest, McpResponse};
use crate::error::{ProtocolError, Result};
use bytes::Bytes;

/// Default maximum message size (10 MB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Trait for message codecs
pub trait Codec: Send + Sync {
    /// Encode a response as one newline-terminated frame
    fn encode(&self, response: &McpResponse) -> Result<Bytes>;

    /// Decode one frame into a request
    fn decode(&self, data: &[u8]) -> Result<McpRequest>;

    fn name(&self) -> &str;

    fn max_size(&self) -> usize {
        DEFAULT_MAX_MESSAGE_SIZE
    }
}

/// Newline-delimited JSON
pub struct JsonCodec {
    max_size: usize,
}

impl JsonCodec {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }

    fn check_size(&self, size: usize) -> Result<()> {
        if size > self.max_size {
            return Err(ProtocolError::MessageTooLarge {
                size,
                max_size: self.max_size,
            }
            .into());
        }
        Ok(())
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGE_SIZE)
    }
}

impl Codec for JsonCodec {
    fn encode(&self, response: &McpResponse) -> Result<Bytes> {
        let mut json = serde_json::to_vec(response)
            .map_err(|e| ProtocolError::EncodingError(e.to_string()))?;

        self.check_size(json.len())?;

        json.push(b'\n');
        Ok(Bytes::from(json))
    }

    fn decode(&self, data: &[u8]) -> Result<McpRequest> {
        // Check size before decoding
        self.check_size(data.len())?;

        let value: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| ProtocolError::ParseError(e.to_string()))?;

        let request = serde_json::from_value(value)
            .map_err(|e| ProtocolError::InvalidRequest(e.to_string()))?;

        Ok(request)
    }

    fn name(&self) -> &str {
        "json"
    }

    fn max_size(&self) -> usize {
        self.max_size
    }
}
