//! In-process [`RepositoryBackend`] for tests.
//!
//! Holds refs and files in memory, records every write, and can be told to
//! fail specific operations a given number of times or panic on them.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::RepositoryBackend;
use crate::error::{AdapterError, AdapterResult};
use crate::types::{FileContent, RefLookup, RepositoryInfo, RepositoryRef};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Op {
    GetInfo,
    GetFile,
    PutFile,
    DeleteFile,
    GetRef(String),
    CreateRef,
}

/// A mutation the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    PutFile {
        path: String,
        content: Vec<u8>,
        message: String,
        replaced_sha: Option<String>,
        branch: Option<String>,
    },
    DeleteFile {
        path: String,
        sha: String,
        message: String,
    },
    CreateRef {
        name: String,
        sha: String,
    },
}

#[derive(Default)]
struct Inner {
    info: Option<RepositoryInfo>,
    refs: HashMap<String, String>,
    files: HashMap<String, FileContent>,
    writes: Vec<Write>,
    failures: HashMap<Op, usize>,
    panics: HashSet<Op>,
    next_blob: u64,
}

impl Inner {
    fn check(&mut self, op: Op) -> AdapterResult<()> {
        if self.panics.contains(&op) {
            panic!("injected panic for {op:?}");
        }
        if let Some(remaining) = self.failures.get_mut(&op) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(AdapterError::Api {
                    status: 503,
                    message: format!("injected failure for {op:?}"),
                });
            }
        }
        Ok(())
    }

    fn blob_sha(&mut self) -> String {
        self.next_blob += 1;
        format!("blob{}", self.next_blob)
    }
}

#[derive(Default)]
pub struct InMemoryBackend {
    inner: Mutex<Inner>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_info(self, info: RepositoryInfo) -> Self {
        self.lock().info = Some(info);
        self
    }

    pub fn with_ref(self, name: &str, sha: &str) -> Self {
        self.lock().refs.insert(name.to_string(), sha.to_string());
        self
    }

    pub fn with_file(self, path: &str, sha: &str, content: &[u8]) -> Self {
        self.lock().files.insert(
            path.to_string(),
            FileContent {
                path: path.to_string(),
                sha: sha.to_string(),
                content: content.to_vec(),
            },
        );
        self
    }

    /// Make the next `times` calls of `op` fail with a 503.
    pub fn fail(&self, op: Op, times: usize) {
        self.lock().failures.insert(op, times);
    }

    /// Make every call of `op` panic, as a bug in the backend would.
    pub fn panic_on(&self, op: Op) {
        self.lock().panics.insert(op);
    }

    pub fn writes(&self) -> Vec<Write> {
        self.lock().writes.clone()
    }

    pub fn ref_sha(&self, name: &str) -> Option<String> {
        self.lock().refs.get(name).cloned()
    }

    pub fn file(&self, path: &str) -> Option<FileContent> {
        self.lock().files.get(path).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl RepositoryBackend for InMemoryBackend {
    async fn get_info(&self, owner: &str, repo: &str) -> AdapterResult<RepositoryInfo> {
        let mut inner = self.lock();
        inner.check(Op::GetInfo)?;
        inner.info.clone().ok_or_else(|| AdapterError::Api {
            status: 404,
            message: format!("repository {owner}/{repo} not found"),
        })
    }

    async fn get_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _branch: Option<&str>,
    ) -> AdapterResult<Option<FileContent>> {
        let mut inner = self.lock();
        inner.check(Op::GetFile)?;
        Ok(inner.files.get(path).cloned())
    }

    async fn put_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        content: &[u8],
        message: &str,
        branch: Option<&str>,
    ) -> AdapterResult<()> {
        let mut inner = self.lock();
        inner.check(Op::PutFile)?;
        let replaced_sha = inner.files.get(path).map(|f| f.sha.clone());
        let sha = inner.blob_sha();
        inner.files.insert(
            path.to_string(),
            FileContent {
                path: path.to_string(),
                sha,
                content: content.to_vec(),
            },
        );
        inner.writes.push(Write::PutFile {
            path: path.to_string(),
            content: content.to_vec(),
            message: message.to_string(),
            replaced_sha,
            branch: branch.map(str::to_string),
        });
        Ok(())
    }

    async fn delete_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        message: &str,
        _branch: Option<&str>,
    ) -> AdapterResult<()> {
        let mut inner = self.lock();
        inner.check(Op::DeleteFile)?;
        let existing = inner
            .files
            .remove(path)
            .ok_or_else(|| AdapterError::FileNotFound(path.to_string()))?;
        inner.writes.push(Write::DeleteFile {
            path: path.to_string(),
            sha: existing.sha,
            message: message.to_string(),
        });
        Ok(())
    }

    async fn get_ref(&self, _owner: &str, _repo: &str, ref_name: &str) -> AdapterResult<RefLookup> {
        let mut inner = self.lock();
        inner.check(Op::GetRef(ref_name.to_string()))?;
        Ok(match inner.refs.get(ref_name) {
            Some(sha) => RefLookup::Found(RepositoryRef {
                name: ref_name.to_string(),
                sha: sha.clone(),
            }),
            None => RefLookup::NotFound,
        })
    }

    async fn create_ref(
        &self,
        _owner: &str,
        _repo: &str,
        ref_name: &str,
        sha: &str,
    ) -> AdapterResult<RepositoryRef> {
        let mut inner = self.lock();
        inner.check(Op::CreateRef)?;
        if inner.refs.contains_key(ref_name) {
            return Err(AdapterError::Api {
                status: 422,
                message: "Reference already exists".to_string(),
            });
        }
        inner.refs.insert(ref_name.to_string(), sha.to_string());
        inner.writes.push(Write::CreateRef {
            name: ref_name.to_string(),
            sha: sha.to_string(),
        });
        Ok(RepositoryRef {
            name: ref_name.to_string(),
            sha: sha.to_string(),
        })
    }
}
