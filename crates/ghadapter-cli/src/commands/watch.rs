use std::future::Future;
use std::path::Path;

use anyhow::Context;
use ghadapter_git::{FileSyncService, FileSyncTarget, WatchSession};
use log::info;

use crate::state::AppState;

pub fn default_commit_message(file_path: &Path) -> String {
    format!("Update {}", file_path.display())
}

/// Start pushing `file_path` on every change. The session runs on a
/// background task until it is shut down.
pub fn start_watch(
    state: &AppState,
    file_path: &Path,
    message: &str,
    queue_capacity: usize,
) -> anyhow::Result<WatchSession> {
    let target = FileSyncTarget::new(&state.owner, &state.repo, file_path, message)
        .context("error setting up file watcher")?;
    let service = FileSyncService::new(state.backend.clone(), target);
    service
        .watch_and_push(queue_capacity)
        .context("error setting up file watcher")
}

/// Keep `session` running until `shutdown` resolves, then stop it cleanly.
/// Returns the number of successful pushes. Fails as soon as the sync task
/// stops without being asked to.
pub async fn run_until<F>(session: WatchSession, shutdown: F) -> anyhow::Result<usize>
where
    F: Future<Output = ()>,
{
    let path = session.path().to_path_buf();
    let pushed = session
        .run_until(shutdown)
        .await
        .with_context(|| format!("error watching {}", path.display()))?;
    info!("stopped watch on {}", path.display());
    Ok(pushed)
}
