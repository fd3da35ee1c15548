//! Repository metadata snapshots.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ghadapter_api::RepositoryInfo;
use ghadapter_store::{JsonFileStore, TargetStorage};

use crate::state::AppState;

/// Fetch the repository's info and keep it as `<output_dir>/<repo>_info.json`.
pub async fn repo_info(
    state: &AppState,
    output_dir: &Path,
) -> anyhow::Result<(RepositoryInfo, PathBuf)> {
    let store = JsonFileStore::for_repo_info(output_dir, &state.repo)
        .context("error choosing the snapshot file")?;

    let info = state
        .backend
        .get_info(&state.owner, &state.repo)
        .await
        .context("error fetching repository info")?;

    save_snapshot(&store, &info)
        .with_context(|| format!("error saving {}", store.path().display()))?;

    Ok((info, store.path().to_path_buf()))
}

fn save_snapshot(storage: &dyn TargetStorage, info: &RepositoryInfo) -> anyhow::Result<()> {
    storage.save_info(info)?;
    Ok(())
}

pub fn render_info(info: &RepositoryInfo) -> String {
    format!(
        "{}\n  {}\n  clone: {}\n  stars: {}  forks: {}",
        info.full_name, info.description, info.clone_url, info.stars, info.forks
    )
}
