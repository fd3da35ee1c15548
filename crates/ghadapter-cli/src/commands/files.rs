//! Commands that write file content to the repository.

use anyhow::Context;

use crate::state::AppState;

/// Create the file, or replace it if it is already there.
pub async fn save_file(
    state: &AppState,
    path: &str,
    message: &str,
    content: &str,
    branch: Option<&str>,
) -> anyhow::Result<()> {
    state
        .backend
        .put_file(&state.owner, &state.repo, path, content.as_bytes(), message, branch)
        .await
        .context("error saving file")
}

pub async fn delete_file(
    state: &AppState,
    path: &str,
    message: &str,
    branch: Option<&str>,
) -> anyhow::Result<()> {
    state
        .backend
        .delete_file(&state.owner, &state.repo, path, message, branch)
        .await
        .context("error deleting file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghadapter_api::{InMemoryBackend, Write};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_save_then_delete() {
        let backend = Arc::new(InMemoryBackend::new());
        let state = AppState::new(backend.clone(), "octo", "hello");

        save_file(&state, "docs/a.md", "add docs", "# hi", None).await.unwrap();
        let stored = backend.file("docs/a.md").unwrap();
        assert_eq!(stored.content, b"# hi");

        delete_file(&state, "docs/a.md", "drop docs", None).await.unwrap();
        assert_eq!(
            backend.writes().last(),
            Some(&Write::DeleteFile {
                path: "docs/a.md".to_string(),
                sha: stored.sha,
                message: "drop docs".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_delete_missing_file_has_context() {
        let state = AppState::new(Arc::new(InMemoryBackend::new()), "octo", "hello");
        let err = delete_file(&state, "nope.md", "drop", None).await.unwrap_err();
        assert_eq!(format!("{err:#}"), "error deleting file: file not found: nope.md");
    }
}
