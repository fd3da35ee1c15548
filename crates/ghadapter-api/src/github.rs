//! GitHub / GitHub Enterprise REST v3 implementation of [`RepositoryBackend`].

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, warn};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::backend::RepositoryBackend;
use crate::error::{AdapterError, AdapterResult};
use crate::types::{repo_path_segments, FileContent, RefLookup, RepositoryInfo, RepositoryRef};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub token: String,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(api_url: &str, token: impl Into<String>) -> AdapterResult<Self> {
        let api_url = Url::parse(api_url)?;
        if api_url.cannot_be_a_base() {
            return Err(AdapterError::InvalidArgument(format!(
                "API URL cannot be used as a base: {api_url}"
            )));
        }

        let token = token.into();
        if token.trim().is_empty() {
            return Err(AdapterError::InvalidArgument(
                "access token must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            token,
            user_agent: format!("gh-adapter/{}", env!("CARGO_PKG_VERSION")),
        })
    }
}

// ---------------------------------------------------------------------------
// Backend struct
// ---------------------------------------------------------------------------

pub struct GitHubBackend {
    http: Client,
    config: ClientConfig,
}

impl GitHubBackend {
    pub fn new(config: ClientConfig) -> AdapterResult<Self> {
        let http = Client::builder().user_agent(&config.user_agent).build()?;
        Ok(Self { http, config })
    }

    /// Join `segments` onto the API base URL, percent-encoding each one.
    fn endpoint<'a, I>(&self, segments: I) -> AdapterResult<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AdapterError::InvalidArgument(format!(
                    "API URL cannot be used as a base: {}",
                    self.config.api_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn contents_url(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> AdapterResult<Url> {
        let segments = ["repos", owner, repo, "contents"]
            .into_iter()
            .chain(repo_path_segments(path)?);
        let mut url = self.endpoint(segments)?;
        if let Some(branch) = branch {
            url.query_pairs_mut().append_pair("ref", branch);
        }
        Ok(url)
    }

    fn ref_url(&self, owner: &str, repo: &str, ref_name: &str) -> AdapterResult<Url> {
        let short = ref_name.strip_prefix("refs/").unwrap_or(ref_name);
        let segments = ["repos", owner, repo, "git", "ref"]
            .into_iter()
            .chain(short.split('/').filter(|s| !s.is_empty()));
        self.endpoint(segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!("{method} {url}");
        self.http
            .request(method, url)
            .bearer_auth(&self.config.token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Send and turn any non-success status into [`AdapterError::Api`].
    async fn send(&self, builder: RequestBuilder) -> AdapterResult<Response> {
        let resp = builder.send().await?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(api_error(resp).await)
        }
    }
}

// ---------------------------------------------------------------------------
// Trait implementation
// ---------------------------------------------------------------------------

#[async_trait]
impl RepositoryBackend for GitHubBackend {
    async fn get_info(&self, owner: &str, repo: &str) -> AdapterResult<RepositoryInfo> {
        let url = self.endpoint(["repos", owner, repo])?;
        let resp = self.send(self.request(Method::GET, url)).await?;
        let body: RepoResponse = read_json(resp).await?;
        Ok(body.into())
    }

    async fn get_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> AdapterResult<Option<FileContent>> {
        let url = self.contents_url(owner, repo, path, branch)?;
        let resp = self.request(Method::GET, url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }

        let body: ContentResponse = read_json(resp).await?;
        let content = match body.content.as_deref() {
            Some(encoded) => decode_content(encoded)?,
            None => Vec::new(),
        };
        Ok(Some(FileContent {
            path: body.path,
            sha: body.sha,
            content,
        }))
    }

    async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &[u8],
        message: &str,
        branch: Option<&str>,
    ) -> AdapterResult<()> {
        let existing = self.get_file(owner, repo, path, branch).await?;
        let body = PutFileBody::new(message, content, existing.as_ref(), branch);

        let url = self.contents_url(owner, repo, path, None)?;
        self.send(self.request(Method::PUT, url).json(&body)).await?;
        Ok(())
    }

    async fn delete_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        message: &str,
        branch: Option<&str>,
    ) -> AdapterResult<()> {
        let existing = self
            .get_file(owner, repo, path, branch)
            .await?
            .ok_or_else(|| AdapterError::FileNotFound(path.to_string()))?;

        let body = DeleteFileBody {
            message,
            sha: &existing.sha,
            branch,
        };
        let url = self.contents_url(owner, repo, path, None)?;
        self.send(self.request(Method::DELETE, url).json(&body)).await?;
        Ok(())
    }

    async fn get_ref(&self, owner: &str, repo: &str, ref_name: &str) -> AdapterResult<RefLookup> {
        let url = self.ref_url(owner, repo, ref_name)?;
        let resp = self.request(Method::GET, url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(RefLookup::NotFound);
        }
        if !resp.status().is_success() {
            return Err(api_error(resp).await);
        }

        let body: RefResponse = read_json(resp).await?;
        Ok(RefLookup::Found(body.into()))
    }

    async fn create_ref(
        &self,
        owner: &str,
        repo: &str,
        ref_name: &str,
        sha: &str,
    ) -> AdapterResult<RepositoryRef> {
        let url = self.endpoint(["repos", owner, repo, "git", "refs"])?;
        let body = CreateRefBody { name: ref_name, sha };
        let resp = self.send(self.request(Method::POST, url).json(&body)).await?;
        let body: RefResponse = read_json(resp).await?;
        Ok(body.into())
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RepoResponse {
    full_name: String,
    description: Option<String>,
    clone_url: String,
    stargazers_count: u64,
    forks_count: u64,
}

impl From<RepoResponse> for RepositoryInfo {
    fn from(r: RepoResponse) -> Self {
        RepositoryInfo {
            full_name: r.full_name,
            description: r.description.unwrap_or_default(),
            clone_url: r.clone_url,
            stars: r.stargazers_count,
            forks: r.forks_count,
        }
    }
}

#[derive(Deserialize)]
struct RefResponse {
    #[serde(rename = "ref")]
    name: String,
    object: RefObject,
}

#[derive(Deserialize)]
struct RefObject {
    sha: String,
}

impl From<RefResponse> for RepositoryRef {
    fn from(r: RefResponse) -> Self {
        RepositoryRef {
            name: r.name,
            sha: r.object.sha,
        }
    }
}

#[derive(Deserialize)]
struct ContentResponse {
    path: String,
    sha: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Serialize)]
struct PutFileBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

impl<'a> PutFileBody<'a> {
    /// An update must carry the sha of the content it replaces.
    fn new(
        message: &'a str,
        content: &[u8],
        existing: Option<&'a FileContent>,
        branch: Option<&'a str>,
    ) -> Self {
        Self {
            message,
            content: STANDARD.encode(content),
            sha: existing.map(|f| f.sha.as_str()),
            branch,
        }
    }
}

#[derive(Serialize)]
struct DeleteFileBody<'a> {
    message: &'a str,
    sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<&'a str>,
}

#[derive(Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    name: &'a str,
    sha: &'a str,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn read_json<T: DeserializeOwned>(resp: Response) -> AdapterResult<T> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| AdapterError::Decode(e.to_string()))
}

async fn api_error(resp: Response) -> AdapterError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    warn!("upstream API returned {status}");
    AdapterError::Api {
        status: status.as_u16(),
        message: error_message(status, &body),
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if !parsed.message.is_empty() {
            return parsed.message;
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        trimmed.to_string()
    }
}

/// The contents API wraps base64 at 60 columns.
fn decode_content(encoded: &str) -> AdapterResult<Vec<u8>> {
    let cleaned: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(cleaned)
        .map_err(|e| AdapterError::Decode(format!("invalid base64 file content: {e}")))
}
