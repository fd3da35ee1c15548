use std::path::PathBuf;

use ghadapter_api::AdapterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("cannot watch {}: path does not exist", .0.display())]
    Missing(PathBuf),
    #[error(transparent)]
    Notify(#[from] notify::Error),
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error(transparent)]
    Watch(#[from] WatchError),
    #[error("sync task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("sync task stopped on its own after {pushed} push(es)")]
    Stopped { pushed: usize },
}
