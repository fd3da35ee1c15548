pub mod json_file;

use ghadapter_api::RepositoryInfo;
use thiserror::Error;

pub use json_file::{info_file_name, JsonFileStore};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("`{0}` cannot be used in a file name")]
    InvalidName(String),
}

/// Somewhere a repository snapshot can be kept.
pub trait TargetStorage {
    fn save_info(&self, info: &RepositoryInfo) -> StoreResult<()>;
}
