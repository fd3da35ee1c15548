use log::{debug, warn};
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::error::WatchError;

/// One write notification for a watched file. No diff, no coalescing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    pub path: PathBuf,
}

/// Keeps the underlying notify watcher alive. Dropping it ends the watch and
/// closes the event channel.
pub struct FileWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `path` for content changes.
    /// Returns a bounded receiver of change events, plus the watcher handle.
    pub fn watch(
        path: impl Into<PathBuf>,
        capacity: usize,
    ) -> Result<(mpsc::Receiver<FileChangeEvent>, FileWatcher), WatchError> {
        let path = path.into();
        if !path.exists() {
            return Err(WatchError::Missing(path));
        }

        let (tx, rx) = mpsc::channel(capacity.max(1));

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if !is_content_change(&event.kind) {
                        return;
                    }
                    for changed in event.paths {
                        debug!("change detected: {}", changed.display());
                        // notify calls us on its own thread, so blocking here
                        // applies backpressure instead of dropping events.
                        if tx.blocking_send(FileChangeEvent { path: changed }).is_err() {
                            return;
                        }
                    }
                }
                Err(e) => warn!("file watch error: {e}"),
            },
            Config::default(),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        Ok((
            rx,
            FileWatcher {
                path,
                _watcher: watcher,
            },
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Only writes to the file's content count; metadata and access events don't.
fn is_content_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any)
    )
}
