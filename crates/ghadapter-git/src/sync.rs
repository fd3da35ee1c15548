//! Push a local file to the repository every time it changes.
//!
//! Change events arrive on a bounded channel and are handled one at a time by
//! a single task, so pushes happen in the order the writes were observed. A
//! failed push is logged and the loop keeps going; nothing is retried.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ghadapter_api::{repo_path_segments, AdapterResult, RepositoryBackend};
use log::{error, info};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::SyncError;
use crate::watcher::{FileChangeEvent, FileWatcher};

/// Where a watched file ends up.
#[derive(Debug, Clone)]
pub struct FileSyncTarget {
    pub owner: String,
    pub repo: String,
    /// Local file that is read on every change.
    pub local_path: PathBuf,
    /// Destination path inside the repository.
    pub path_in_repo: String,
    pub message: String,
}

impl FileSyncTarget {
    /// The repository path mirrors `local_path` as typed, minus any leading
    /// `./` or `/`.
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        local_path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> AdapterResult<Self> {
        let local_path = local_path.into();
        let path_in_repo = repo_path_for(&local_path)?;
        Ok(Self {
            owner: owner.into(),
            repo: repo.into(),
            local_path,
            path_in_repo,
            message: message.into(),
        })
    }
}

/// Fails on `..` or inner `.` segments, which have no place inside the
/// repository.
pub fn repo_path_for(local: &Path) -> AdapterResult<String> {
    let raw = local.to_string_lossy().replace('\\', "/");
    let mut trimmed = raw.as_str();
    loop {
        if let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest;
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            trimmed = rest;
        } else {
            break;
        }
    }
    repo_path_segments(trimmed)?;
    Ok(trimmed.to_string())
}

pub struct FileSyncService {
    backend: Arc<dyn RepositoryBackend>,
    target: FileSyncTarget,
}

impl FileSyncService {
    pub fn new(backend: Arc<dyn RepositoryBackend>, target: FileSyncTarget) -> Self {
        Self { backend, target }
    }

    /// Read the whole file and commit it to the default branch.
    pub async fn push_current(&self) -> Result<(), SyncError> {
        let target = &self.target;
        let content = tokio::fs::read(&target.local_path)
            .await
            .map_err(|source| SyncError::Read {
                path: target.local_path.clone(),
                source,
            })?;

        self.backend
            .put_file(
                &target.owner,
                &target.repo,
                &target.path_in_repo,
                &content,
                &target.message,
                None,
            )
            .await?;

        info!(
            "pushed {} ({} bytes) to {}/{}",
            target.path_in_repo,
            content.len(),
            target.owner,
            target.repo
        );
        Ok(())
    }

    /// Drain `events` on a background task until cancelled or the channel
    /// closes.
    pub fn spawn(self, mut events: mpsc::Receiver<FileChangeEvent>) -> SyncHandle {
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut pushed = 0usize;
            loop {
                tokio::select! {
                    biased;
                    _ = &mut cancel_rx => break,
                    event = events.recv() => {
                        let Some(event) = event else { break };
                        match self.push_current().await {
                            Ok(()) => pushed += 1,
                            Err(e) => error!(
                                "failed to push change to {}: {e}",
                                event.path.display()
                            ),
                        }
                    }
                }
            }
            pushed
        });

        SyncHandle {
            cancel: Some(cancel_tx),
            task,
        }
    }

    /// Start watching the target's local file and push every change.
    pub fn watch_and_push(self, capacity: usize) -> Result<WatchSession, SyncError> {
        let (events, watcher) = FileWatcher::watch(&self.target.local_path, capacity)?;
        let handle = self.spawn(events);
        Ok(WatchSession { watcher, handle })
    }
}

/// Owned handle to the sync task. Dropping it also stops the task.
pub struct SyncHandle {
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<usize>,
}

impl SyncHandle {
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for the task to stop. Returns how many pushes succeeded.
    pub async fn join(self) -> Result<usize, SyncError> {
        // Hold the sender until the task is done so it isn't seen as a cancel.
        let _cancel = self.cancel;
        Ok(self.task.await?)
    }

    /// Let the task run until `shutdown` resolves, then cancel it and wait.
    ///
    /// A task that stops first, because it panicked or its events ran out,
    /// is an error: [`SyncError::Join`] or [`SyncError::Stopped`].
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<usize, SyncError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            finished = &mut self.task => {
                let pushed = finished?;
                Err(SyncError::Stopped { pushed })
            }
            _ = shutdown => {
                self.cancel();
                self.join().await
            }
        }
    }
}

/// A running watch: the notifier plus the task consuming its events.
pub struct WatchSession {
    watcher: FileWatcher,
    handle: SyncHandle,
}

impl WatchSession {
    pub fn path(&self) -> &Path {
        self.watcher.path()
    }

    /// Push changes until `shutdown` resolves, then stop watching and wait
    /// for the in-flight push, if any. See [`SyncHandle::run_until`].
    pub async fn run_until<F>(self, shutdown: F) -> Result<usize, SyncError>
    where
        F: Future<Output = ()>,
    {
        let WatchSession { watcher, handle } = self;
        let result = handle.run_until(shutdown).await;
        drop(watcher);
        result
    }
}
