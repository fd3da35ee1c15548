//! The remote capability every command goes through.
//!
//! [`GitHubBackend`](crate::GitHubBackend) satisfies it against the REST API;
//! tests use [`InMemoryBackend`](crate::InMemoryBackend) behind the
//! `test-util` feature.

use async_trait::async_trait;

use crate::error::AdapterResult;
use crate::types::{FileContent, RefLookup, RepositoryInfo, RepositoryRef};

#[async_trait]
pub trait RepositoryBackend: Send + Sync {
    /// Fetch repository metadata. Never cached.
    async fn get_info(&self, owner: &str, repo: &str) -> AdapterResult<RepositoryInfo>;

    /// Read a file at `path`. `None` when the file does not exist.
    /// `branch` of `None` means the repository's default branch.
    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> AdapterResult<Option<FileContent>>;

    /// Create the file, or replace its content if it already exists.
    async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &[u8],
        message: &str,
        branch: Option<&str>,
    ) -> AdapterResult<()>;

    /// Delete the file at `path`. Fails with `FileNotFound` before issuing any
    /// delete when the file is missing.
    async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        branch: Option<&str>,
    ) -> AdapterResult<()>;

    /// Resolve a fully qualified ref name such as `refs/heads/main`.
    async fn get_ref(&self, owner: &str, repo: &str, ref_name: &str) -> AdapterResult<RefLookup>;

    /// Create a new ref. Rejected by the backend if the ref already exists.
    async fn create_ref(
        &self,
        owner: &str,
        repo: &str,
        ref_name: &str,
        sha: &str,
    ) -> AdapterResult<RepositoryRef>;
}
