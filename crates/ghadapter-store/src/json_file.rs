use std::fs;
use std::path::{Path, PathBuf};

use ghadapter_api::RepositoryInfo;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::{StoreError, StoreResult, TargetStorage};

/// Writes one record per file as indented JSON.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for a repository snapshot: `<dir>/<repo>_info.json`. The file
    /// always lands directly in `dir`.
    pub fn for_repo_info(dir: &Path, repo: &str) -> StoreResult<Self> {
        if repo.is_empty() || repo.contains(['/', '\\']) {
            return Err(StoreError::InvalidName(repo.to_string()));
        }
        Ok(Self::new(dir.join(info_file_name(repo))))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with `record`. Fields keep their declaration order.
    pub fn save<T: Serialize>(&self, record: &T) -> StoreResult<()> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        record.serialize(&mut ser)?;
        buf.push(b'\n');

        fs::write(&self.path, &buf)?;
        debug!("wrote {} bytes to {}", buf.len(), self.path.display());
        Ok(())
    }

    pub fn load<T: DeserializeOwned>(&self) -> StoreResult<T> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl TargetStorage for JsonFileStore {
    fn save_info(&self, info: &RepositoryInfo) -> StoreResult<()> {
        self.save(info)
    }
}

pub fn info_file_name(repo: &str) -> String {
    format!("{repo}_info.json")
}
