//! Connection state shared by every command: the backend plus the repository
//! it is pointed at.

use std::sync::Arc;

use anyhow::Context;
use ghadapter_api::{ClientConfig, GitHubBackend, RepositoryBackend};

use crate::cli::RemoteArgs;

pub struct AppState {
    pub backend: Arc<dyn RepositoryBackend>,
    pub owner: String,
    pub repo: String,
}

impl AppState {
    pub fn new(backend: Arc<dyn RepositoryBackend>, owner: &str, repo: &str) -> Self {
        Self {
            backend,
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    /// Build a GitHub client from the command-line flags.
    pub fn connect(remote: &RemoteArgs) -> anyhow::Result<Self> {
        let config = ClientConfig::new(&remote.api_url, remote.access_token.as_str())
            .context("invalid client configuration")?;
        log::debug!("using API at {}", config.api_url);
        let backend = GitHubBackend::new(config).context("failed to build HTTP client")?;
        Ok(Self::new(Arc::new(backend), &remote.owner, &remote.repo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(api_url: &str) -> RemoteArgs {
        RemoteArgs {
            access_token: "t0ken".to_string(),
            api_url: api_url.to_string(),
            owner: "octo".to_string(),
            repo: "hello".to_string(),
        }
    }

    #[test]
    fn test_connect() {
        let state = AppState::connect(&remote(ghadapter_api::DEFAULT_API_URL)).unwrap();
        assert_eq!(state.owner, "octo");
        assert_eq!(state.repo, "hello");
    }

    #[test]
    fn test_connect_rejects_bad_api_url() {
        let err = AppState::connect(&remote("::nope::")).err().unwrap();
        assert!(format!("{err:#}").starts_with("invalid client configuration"));
    }
}
