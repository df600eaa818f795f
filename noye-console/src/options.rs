//! Mutable console settings with help text.
//!
//! The set of options is fixed at startup; only values change afterwards.

use std::collections::BTreeMap;
use std::fmt::Write;

/// A single named setting.
#[derive(Debug, Clone)]
pub struct Opt {
    pub name: String,
    pub value: String,
    pub help: String,
}

/// The console's option table.
///
/// BTreeMap keeps the two blocks of [`Options::render`] in one consistent
/// order.
#[derive(Debug)]
pub struct Options {
    opts: BTreeMap<String, Opt>,
}

impl Options {
    /// The default set: the fabricated sender and the target channel.
    pub fn defaults() -> Self {
        let mut opts = BTreeMap::new();
        for (name, value, help) in [
            ("from", "test", "nick of person sending the messages"),
            ("chan", "#noye", "the channel which messages are sent to"),
        ] {
            opts.insert(
                name.to_string(),
                Opt {
                    name: name.to_string(),
                    value: value.to_string(),
                    help: help.to_string(),
                },
            );
        }
        Self { opts }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.opts.get(name).map(|opt| opt.value.as_str())
    }

    /// Updates a known option in place, returning the previous value.
    ///
    /// Unknown names are never inserted; `None` signals the caller to fall
    /// back to the listing.
    pub fn set(&mut self, name: &str, value: &str) -> Option<String> {
        let opt = self.opts.get_mut(name)?;
        Some(std::mem::replace(&mut opt.value, value.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Opt> {
        self.opts.values()
    }

    /// Renders the help block followed by the current values, both in the
    /// same order.
    pub fn render(&self) -> String {
        let mut out = String::from("available options:");
        for opt in self.opts.values() {
            let _ = write!(out, "\n  {}: {}", opt.name, opt.help);
        }
        out.push_str("\ncurrent:");
        for opt in self.opts.values() {
            let _ = write!(out, "\n  {}: {}", opt.name, opt.value);
        }
        out
    }
}
