//! The asynchronous output queue and its printer task.
//!
//! Simulated bot callbacks push fully formatted lines from whatever call
//! stack they run on; a single printer task drains them in FIFO order and
//! interleaves them with the interactive prompt.

use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// Producer half of the output queue. Cheap to clone and to hand to
/// collaborators.
#[derive(Debug, Clone)]
pub struct OutputSender {
    tx: mpsc::UnboundedSender<String>,
}

impl OutputSender {
    /// Queues one formatted line. A closed receiver means the process is
    /// tearing down, so the line is silently dropped.
    pub fn push(&self, line: impl Into<String>) {
        let _ = self.tx.send(line.into());
    }
}

/// Creates the queue: one sender for producers, one receiver for the
/// printer task.
pub fn channel() -> (OutputSender, UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (OutputSender { tx }, rx)
}

/// Drains the queue and prints each line, reprinting the prompt after it so
/// the operator keeps an input line to type on.
///
/// The leading `\r` overwrites whatever half-typed prompt the asynchronous
/// line landed on.
pub async fn printer(mut rx: UnboundedReceiver<String>, prompt: &str) {
    let mut stdout = tokio::io::stdout();
    while let Some(line) = rx.recv().await {
        let rendered = format!("\r< {line}\n{prompt}");
        if stdout.write_all(rendered.as_bytes()).await.is_err() {
            break;
        }
        let _ = stdout.flush().await;
    }
}
