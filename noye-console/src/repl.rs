//! The interactive read loop.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing::warn;

use crate::commands::Registry;
use crate::context::Context;

pub const PROMPT: &str = "noye> ";

/// Prompts, reads, and dispatches until end of input or a read error.
///
/// Returning does not end the process: the caller keeps it alive until an
/// interrupt arrives, so background output stays observable after stdin
/// closes.
pub async fn run(registry: &Registry, ctx: &mut Context) {
    let mut stdout = tokio::io::stdout();
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut input = String::new();

    loop {
        if write_prompt(&mut stdout).await.is_err() {
            break;
        }

        input.clear();
        match stdin.read_line(&mut input).await {
            Ok(0) => break,
            Ok(_) => registry.dispatch(ctx, input.trim()),
            Err(err) => {
                warn!(error = %err, "reading input failed");
                break;
            }
        }
    }
}

async fn write_prompt(stdout: &mut Stdout) -> std::io::Result<()> {
    stdout.write_all(PROMPT.as_bytes()).await?;
    stdout.flush().await
}
