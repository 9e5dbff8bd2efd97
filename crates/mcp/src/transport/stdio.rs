// Newline-delimited JSON-RPC over stdin/stdout
//
// stdout carries protocol messages only; logs go to stderr.

use crate::server::McpServer;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Serve MCP on the process's stdin and stdout until stdin closes.
pub async fn serve_stdio(server: McpServer) -> Result<()> {
    tracing::info!("MCP server listening on stdio");
    serve_lines(&server, tokio::io::stdin(), tokio::io::stdout()).await?;
    tracing::info!("stdin closed, shutting down");
    Ok(())
}

/// Read one message per line and write one response per line.
pub async fn serve_lines<R, W>(server: &McpServer, reader: R, mut writer: W) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read from stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(response) = server.handle_message(line).await {
            writer
                .write_all(response.as_bytes())
                .await
                .context("Failed to write response")?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
    }

    Ok(())
}
