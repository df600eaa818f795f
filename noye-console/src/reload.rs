//! Script auto-reload driven by filesystem notifications.
//!
//! Editors that save via rename show up as a delete of the watched path, so
//! a delete event is the reload signal; everything else is noise. The
//! worker loop re-loads the script and re-establishes the watch, mirroring
//! what the `l` command did for the initial load.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::context::Shared;

/// Stream of raw watcher events, bridged out of notify's callback thread.
pub type WatchEvents = UnboundedReceiver<notify::Result<Event>>;

/// The OS watcher handle plus the set of registered paths.
///
/// Both are shared between the REPL (the `l` command) and the reload
/// worker, hence the mutexes.
pub struct Reloader {
    watcher: Mutex<RecommendedWatcher>,
    watched: Mutex<BTreeSet<PathBuf>>,
}

impl Reloader {
    /// Builds the OS watcher and the channel its events arrive on.
    ///
    /// Failure is fatal to the caller: without the watcher the console
    /// cannot provide auto-reload at all.
    pub fn new() -> Result<(Self, WatchEvents)> {
        let (tx, rx) = mpsc::unbounded_channel();
        let watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
            let _ = tx.send(event);
        })
        .context("creating filesystem watcher")?;

        let reloader = Self {
            watcher: Mutex::new(watcher),
            watched: Mutex::new(BTreeSet::new()),
        };
        Ok((reloader, rx))
    }

    /// Registers a path. Watching an already-watched path is a no-op; a
    /// watch error is logged and the registration rolled back.
    pub fn watch(&self, path: &Path) {
        let mut watched = self.watched.lock().unwrap();
        if !watched.insert(path.to_path_buf()) {
            debug!(path = %path.display(), "already watching");
            return;
        }
        if let Err(err) = self
            .watcher
            .lock()
            .unwrap()
            .watch(path, RecursiveMode::NonRecursive)
        {
            warn!(path = %path.display(), error = %err, "failed to watch");
            watched.remove(path);
        }
    }

    /// Re-arms the watch after the OS dropped it along with the deleted
    /// file. The path stays registered either way.
    fn rewatch(&self, path: &Path) {
        let mut watcher = self.watcher.lock().unwrap();
        let _ = watcher.unwatch(path);
        if let Err(err) = watcher.watch(path, RecursiveMode::NonRecursive) {
            warn!(path = %path.display(), error = %err, "failed to re-watch");
        }
    }

    /// Snapshot of the registered paths, for `dump`.
    pub fn watched(&self) -> Vec<PathBuf> {
        self.watched.lock().unwrap().iter().cloned().collect()
    }
}

/// Loads a script and, on success, registers it for auto-reload. Errors are
/// logged and the operation abandoned; the console keeps running.
pub fn load_and_watch(shared: &Shared, path: &Path) {
    let result = shared.manager.lock().unwrap().load(path);
    if let Err(err) = result {
        warn!(path = %path.display(), error = %err, "error loading script");
        return;
    }
    shared.reloader.watch(path);
}

/// The reload worker: consumes watcher events until the channel closes.
///
/// Only delete events trigger a reload; watcher-stream errors are logged
/// and the loop keeps going.
pub async fn run(shared: Arc<Shared>, mut events: WatchEvents) {
    while let Some(event) = events.recv().await {
        match event {
            Ok(event) if matches!(event.kind, EventKind::Remove(_)) => {
                for path in &event.paths {
                    reload(&shared, path);
                }
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "watch stream error"),
        }
    }
}

fn reload(shared: &Shared, path: &Path) {
    info!(path = %path.display(), "script removed on disk, reloading");
    let result = shared.manager.lock().unwrap().load(path);
    match result {
        Ok(()) => shared.reloader.rewatch(path),
        // Keep the old registration; the operator can re-issue `l` once the
        // file is fixed.
        Err(err) => warn!(path = %path.display(), error = %err, "auto reload failed"),
    }
}
