//! The simulated bot backend.
//!
//! The script manager talks to the connection through these callbacks; the
//! mock implementation turns each one into a formatted line on the output
//! queue so the operator can see what the bot would have sent.

use crate::output::OutputSender;

/// Connection-side operations the script manager can invoke.
pub trait Bot: Send {
    fn privmsg(&self, target: &str, text: &str);
    fn join(&self, target: &str);
    fn part(&self, target: &str);
    fn send(&self, line: &str);
}

/// Backend used by the console: no network, every call becomes an output
/// line.
#[derive(Debug, Clone)]
pub struct MockBot {
    output: OutputSender,
}

impl MockBot {
    pub fn new(output: OutputSender) -> Self {
        Self { output }
    }
}

impl Bot for MockBot {
    fn privmsg(&self, target: &str, text: &str) {
        self.output.push(format!("(PRIVMSG) {target}: {text}"));
    }

    fn join(&self, target: &str) {
        self.output.push(format!("(JOIN) {target}"));
    }

    fn part(&self, target: &str) {
        self.output.push(format!("(PART) {target}"));
    }

    fn send(&self, line: &str) {
        self.output.push(format!("(SEND) {line}"));
    }
}
