//! Stdio transport: newline-delimited JSON-RPC over stdin/stdout.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult};

use super::framing;
use super::shutdown::Shutdown;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: Arc<ProtocolHandler>,
}

impl StdioTransport {
    pub fn new(handler: Arc<ProtocolHandler>) -> Self {
        Self { handler }
    }

    /// Serve stdin/stdout until EOF or shutdown.
    pub async fn run(&self, shutdown: Shutdown) -> McpResult<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer, shutdown).await
    }

    /// Run the read/dispatch/write loop over any line-oriented stream.
    ///
    /// Requests are answered strictly in arrival order. Shutdown is only
    /// observed while waiting for the next line.
    pub async fn serve<R, W>(
        &self,
        mut reader: R,
        mut writer: W,
        mut shutdown: Shutdown,
    ) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = Vec::new();

        tracing::info!("Stdio transport started");

        loop {
            line.clear();

            let bytes_read = tokio::select! {
                biased;
                _ = shutdown.wait() => {
                    tracing::info!("Shutdown requested, stopping stdio transport");
                    break;
                }
                read = reader.read_until(b'\n', &mut line) => read.map_err(McpError::Io)?,
            };

            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }

            if line.last() != Some(&b'\n') {
                tracing::warn!("Discarding unterminated line ({bytes_read} bytes) at EOF");
                break;
            }

            let Some(message) = framing::unframe(&line) else {
                continue;
            };

            tracing::debug!("Received: {}", String::from_utf8_lossy(message));

            let response = self.handler.handle_bytes(message).await;
            writer
                .write_all(&framing::frame(&response))
                .await
                .map_err(McpError::Io)?;
            writer.flush().await.map_err(McpError::Io)?;
        }

        Ok(())
    }
}
