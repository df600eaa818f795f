//! Sectioned key-value storage plus the process-wide debug flag.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Thread-safe key-value store, grouped into named sections.
///
/// The configuration map is copied into the `"config"` section at startup.
/// BTreeMap keeps `dump`-style output deterministic.
#[derive(Debug, Default)]
pub struct Store {
    data: Mutex<BTreeMap<String, BTreeMap<String, String>>>,
    debug: AtomicBool,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, overwriting any existing entry.
    pub fn set(&self, section: &str, key: &str, value: &str) {
        self.data
            .lock()
            .unwrap()
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.data
            .lock()
            .unwrap()
            .get(section)
            .and_then(|entries| entries.get(key))
            .cloned()
    }

    pub fn debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Flips the debug flag and returns the new state.
    pub fn toggle_debug(&self) -> bool {
        !self.debug.fetch_xor(true, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_isolated() {
        let store = Store::new();
        store.set("config", "nickname", "noye");
        store.set("scripts", "nickname", "other");

        assert_eq!(store.get("config", "nickname").as_deref(), Some("noye"));
        assert_eq!(store.get("scripts", "nickname").as_deref(), Some("other"));
        assert!(store.get("config", "missing").is_none());
        assert!(store.get("missing", "nickname").is_none());
    }

    #[test]
    fn toggle_reports_the_new_state() {
        let store = Store::new();
        assert!(!store.debug());
        assert!(store.toggle_debug());
        assert!(store.debug());
        assert!(!store.toggle_debug());
        assert!(!store.debug());
    }
}
