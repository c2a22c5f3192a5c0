use std::ffi::OsString;
use std::path::Path;
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum FileEvent {
    /// The data file was created, rewritten or removed.
    Changed,
}

/// Watches the data file so the TUI can re-read it after outside edits.
pub struct DataFileWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl DataFileWatcher {
    /// Start watching `data_file`.
    /// Returns a watcher whose `poll()` method should be called each tick.
    pub fn start(data_file: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let file_name: Option<OsString> = data_file.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                // Atomic saves land as a rename onto the data file name
                let relevant = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if relevant {
                    let _ = tx.send(FileEvent::Changed);
                }
            },
            Config::default(),
        )?;

        // Watch the directory: the file itself is replaced on every save
        let dir = match data_file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        Ok(DataFileWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll. True if the data file changed since the last call.
    pub fn poll(&self) -> bool {
        let mut changed = false;
        while let Ok(FileEvent::Changed) = self.rx.try_recv() {
            changed = true;
        }
        changed
    }
}
