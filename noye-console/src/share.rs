//! The broadcast side-channel scripts subscribe to, with a blacklist of
//! private keys that must never be fanned out.

use std::collections::BTreeSet;
use std::sync::Mutex;

use tracing::{info, warn};

use crate::output::OutputSender;

pub struct Share {
    private: Mutex<BTreeSet<String>>,
    output: OutputSender,
}

impl Share {
    pub fn new(output: OutputSender) -> Self {
        Self {
            private: Mutex::new(BTreeSet::new()),
            output,
        }
    }

    /// Publishes a value under a key, unless the key has been blacklisted.
    pub fn broadcast(&self, key: &str, value: &str) {
        if self.private.lock().unwrap().contains(key) {
            warn!(key, "key is private, dropping broadcast");
            return;
        }
        self.output.push(format!("(BROADCAST) {key}: {value}"));
    }

    /// Marks keys as private. Already-private keys are accepted silently.
    pub fn add_private(&self, keys: &[&str]) {
        let mut private = self.private.lock().unwrap();
        for &key in keys {
            if private.insert(key.to_string()) {
                info!(key, "key marked private");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output;

    #[tokio::test]
    async fn private_keys_suppress_broadcasts() {
        let (tx, mut rx) = output::channel();
        let share = Share::new(tx);

        share.broadcast("weather", "raining");
        assert_eq!(
            rx.recv().await.as_deref(),
            Some("(BROADCAST) weather: raining")
        );

        share.add_private(&["auth"]);
        share.broadcast("auth", "hunter2");
        share.broadcast("weather", "clearing");
        assert_eq!(
            rx.recv().await.as_deref(),
            Some("(BROADCAST) weather: clearing")
        );
    }
}
