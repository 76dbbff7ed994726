//! Line-oriented tool server: one JSON [`ToolCall`] per stdin line, one JSON
//! [`ToolResult`] per stdout line.

use std::future::Future;

use anyhow::Result;
use portfolio_lens_core::tools::{ToolCall, ToolDispatcher, ToolResult};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

pub async fn run(dispatcher: &ToolDispatcher) -> Result<()> {
    info!("serving tool calls on stdin");
    serve_lines(move |call| async move {
        debug!(tool = %call.tool, "tool call");
        dispatcher.call(&call).await
    })
    .await
}

/// Answer every call with the same failure, e.g. when the feed client could
/// not be set up.
pub async fn reject_all(output: &str) -> Result<()> {
    serve_lines(move |call| async move {
        ToolResult {
            tool: call.tool,
            id: call.id,
            success: false,
            output: output.to_string(),
        }
    })
    .await
}

async fn serve_lines<F, Fut>(mut answer: F) -> Result<()>
where
    F: FnMut(ToolCall) -> Fut,
    Fut: Future<Output = ToolResult>,
{
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<ToolCall>(&line) {
            Ok(call) => answer(call).await,
            Err(e) => ToolResult {
                tool: String::new(),
                id: None,
                success: false,
                output: format!("Error: malformed tool call: {e}"),
            },
        };

        let mut encoded = serde_json::to_string(&result)?;
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }

    info!("stdin closed, stopping");
    Ok(())
}
