pub mod backend;
pub mod error;
pub mod github;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod types;

pub use backend::RepositoryBackend;
pub use error::{AdapterError, AdapterResult};
pub use github::{ClientConfig, GitHubBackend, DEFAULT_API_URL};
#[cfg(any(test, feature = "test-util"))]
pub use memory::{InMemoryBackend, Op, Write};
pub use types::{
    repo_path_segments, BranchCreationRequest, BranchOutcome, FileContent, RefLookup,
    RepositoryInfo, RepositoryRef,
};
