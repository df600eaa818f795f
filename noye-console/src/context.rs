//! Application state, owned explicitly instead of living in globals.

use std::sync::{Arc, Mutex};

use crate::options::Options;
use crate::reload::Reloader;
use crate::sandbox::Manager;
use crate::share::Share;
use crate::store::Store;

/// State reachable from the background workers as well as the REPL.
///
/// The manager and the reloader's watch set are the only things two tasks
/// genuinely race on; both sit behind a `Mutex`, and no lock is ever held
/// across an await.
pub struct Shared {
    pub manager: Mutex<Box<dyn Manager>>,
    pub reloader: Reloader,
    pub store: Store,
}

impl Shared {
    pub fn new(manager: Box<dyn Manager>, reloader: Reloader) -> Self {
        Self {
            manager: Mutex::new(manager),
            reloader,
            store: Store::new(),
        }
    }
}

/// Everything a command handler can touch, passed into each invocation.
///
/// Options and the share channel belong to the REPL task alone; handlers
/// run to completion there, so neither needs a lock.
pub struct Context {
    pub shared: Arc<Shared>,
    pub options: Options,
    pub share: Share,
}
