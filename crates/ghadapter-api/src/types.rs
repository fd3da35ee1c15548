use serde::{Deserialize, Serialize};

use crate::error::AdapterError;

/// A named branch pointer and the commit it currently targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    /// Fully qualified, e.g. `refs/heads/main`.
    pub name: String,
    pub sha: String,
}

/// Outcome of resolving a ref. Failures other than "missing" are reported
/// through the surrounding `Result`, never as `NotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefLookup {
    Found(RepositoryRef),
    NotFound,
}

/// Snapshot of repository metadata, serialized with the field names used by
/// the `<repo>_info.json` files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    #[serde(rename = "FullName")]
    pub full_name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "CloneURL")]
    pub clone_url: String,
    #[serde(rename = "Stars")]
    pub stars: u64,
    #[serde(rename = "Forks")]
    pub forks: u64,
}

/// A stored file together with the content hash needed to update or delete it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    pub sha: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCreationRequest {
    pub owner: String,
    pub repo: String,
    pub branch_name: String,
    pub base_branch: String,
}

impl BranchCreationRequest {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch_name: impl Into<String>,
        base_branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch_name: branch_name.into(),
            base_branch: base_branch.into(),
        }
    }

    /// Every field is required; nothing beyond emptiness is checked here.
    pub fn validate(&self) -> Result<(), AdapterError> {
        for (field, value) in [
            ("owner", &self.owner),
            ("repo", &self.repo),
            ("branch name", &self.branch_name),
            ("base branch", &self.base_branch),
        ] {
            if value.trim().is_empty() {
                return Err(AdapterError::InvalidArgument(format!("{field} must not be empty")));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    Created { sha: String },
    AlreadyExists,
}

/// Split a repository path on `/`, skipping empty segments. `.` and `..`
/// are refused; a URL would silently resolve them to a different file.
pub fn repo_path_segments(path: &str) -> Result<Vec<&str>, AdapterError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(AdapterError::InvalidArgument(format!(
            "path must not contain `.` or `..` segments: {path}"
        )));
    }
    Ok(segments)
}
