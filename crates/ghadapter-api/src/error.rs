use thiserror::Error;

pub type AdapterResult<T> = Result<T, AdapterError>;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("base branch not found: {0}")]
    BaseBranchNotFound(String),

    #[error("error creating new branch {branch}: {reason}")]
    BranchCreationFailed { branch: String, reason: String },

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Url(#[from] url::ParseError),
}
