//! Stdio transport: newline-delimited JSON-RPC

use super::handler::MessageHandler;
use super::messages::{McpResponse, INVALID_REQUEST};
use crate::error::{ProtocolError, Result, ServerError};
use crate::shutdown::ShutdownNotifier;
use bytes::Bytes;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Responses waiting for the writer
const OUTBOUND_QUEUE: usize = 64;

/// One newline-delimited frame read from the input
#[derive(Debug, PartialEq, Eq)]
enum Frame {
    Line(Vec<u8>),
    /// Line longer than the limit; its bytes were discarded while reading
    TooLarge(usize),
    Eof,
}

/// Read up to the next newline, buffering at most `max_size` bytes.
///
/// Bytes past the limit are consumed and dropped so an unterminated or
/// oversized line never grows the buffer beyond `max_size`.
async fn read_frame<R>(reader: &mut R, max_size: usize) -> std::io::Result<Frame>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = Vec::new();
    let mut oversized = 0usize;

    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(if oversized > 0 {
                Frame::TooLarge(oversized)
            } else if line.is_empty() {
                Frame::Eof
            } else {
                Frame::Line(line)
            });
        }

        let newline = available.iter().position(|b| *b == b'\n');
        let chunk = &available[..newline.unwrap_or(available.len())];

        if oversized == 0 && line.len() + chunk.len() <= max_size {
            line.extend_from_slice(chunk);
        } else {
            oversized += line.len() + chunk.len();
            line = Vec::new();
        }

        let consumed = newline.map_or(available.len(), |i| i + 1);
        reader.consume(consumed);

        if newline.is_some() {
            return Ok(if oversized > 0 {
                Frame::TooLarge(oversized)
            } else {
                Frame::Line(line)
            });
        }
    }
}

/// Serve MCP over the process's stdin and stdout
pub async fn serve_stdio(handler: Arc<dyn MessageHandler>, shutdown: ShutdownNotifier) -> Result<()> {
    info!("Serving MCP on stdio ({} codec)", handler.codec().name());
    serve_lines(handler, tokio::io::stdin(), tokio::io::stdout(), shutdown).await
}

/// Serve MCP over any line-oriented byte stream.
///
/// Each request is handled on its own task; responses go through a
/// channel to a single writer so frames never interleave. Returns when the
/// input ends or shutdown is signaled, after in-flight responses are written.
pub async fn serve_lines<R, W>(
    handler: Arc<dyn MessageHandler>,
    reader: R,
    writer: W,
    shutdown: ShutdownNotifier,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<Bytes>(OUTBOUND_QUEUE);

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(frame) = rx.recv().await {
            writer.write_all(&frame).await?;
            writer.flush().await?;
        }
        Ok::<_, std::io::Error>(())
    });

    let max_size = handler.codec().max_size();
    let mut reader = BufReader::new(reader);

    loop {
        let frame = tokio::select! {
            _ = shutdown.wait() => {
                info!("Shutdown requested, closing stdio transport");
                break;
            }
            frame = read_frame(&mut reader, max_size) => frame.map_err(ProtocolError::Transport)?,
        };

        let line = match frame {
            Frame::Eof => {
                info!("Input closed, stopping");
                break;
            }
            Frame::TooLarge(size) => {
                let rejection = ProtocolError::MessageTooLarge { size, max_size };
                warn!("Rejected message: {}", rejection);
                let response = McpResponse::error(None, INVALID_REQUEST, rejection.to_string());
                match handler.codec().encode(&response) {
                    Ok(frame) => {
                        if tx.send(frame).await.is_err() {
                            debug!("Writer closed before response was sent");
                        }
                    }
                    Err(e) => error!("Failed to encode response: {}", e),
                }
                continue;
            }
            Frame::Line(line) => line,
        };

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let handler = Arc::clone(&handler);
        let tx = tx.clone();
        tokio::spawn(async move {
            let Some(response) = handler.handle_frame(&line).await else {
                return;
            };

            match handler.codec().encode(&response) {
                Ok(frame) => {
                    if tx.send(frame).await.is_err() {
                        debug!("Writer closed before response was sent");
                    }
                }
                Err(e) => error!("Failed to encode response: {}", e),
            }
        });
    }

    drop(tx);

    writer_task
        .await
        .map_err(|e| ServerError::Internal(format!("writer task failed: {}", e)))?
        .map_err(ProtocolError::Transport)?;

    Ok(())
}
