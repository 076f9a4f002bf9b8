//! GitHub REST API content source.
//!
//! Provides a sync HTTP client for the repository contents endpoint:
//! `GET {api}/repos/{owner}/{repo}/contents/{path}?ref={branch}`.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use ureq::Agent;

use crate::error::FetchError;
use crate::source::ContentSource;
use crate::types::{FileBody, FileEntry};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// RFC 3986 unreserved characters stay literal in path segments.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Repository coordinates: owner, name and branch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl Repository {
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
        }
    }

    /// Link to GitHub's web editor for a file.
    ///
    /// ```
    /// use kb_github::Repository;
    ///
    /// let repo = Repository::new("FrontendKnowledgeBase", "FrontendCompetencies", "main");
    /// assert_eq!(
    ///     repo.edit_url("README.md"),
    ///     "https://github.com/FrontendKnowledgeBase/FrontendCompetencies/edit/main/README.md"
    /// );
    /// ```
    #[must_use]
    pub fn edit_url(&self, path: &str) -> String {
        format!(
            "https://github.com/{}/{}/edit/{}/{}",
            self.owner, self.repo, self.branch, path
        )
    }
}

/// Contents response: a directory listing or a single entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing {
    Many(Vec<FileEntry>),
    One(FileEntry),
}

/// [`ContentSource`] backed by the GitHub REST API.
pub struct GithubSource {
    agent: Agent,
    api_url: String,
    repository: Repository,
    token: Option<String>,
}

impl GithubSource {
    /// Create a source for `repository` served by `api_url`.
    ///
    /// An empty token is treated as absent.
    #[must_use]
    pub fn new(api_url: &str, repository: Repository, token: Option<String>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_owned(),
            repository,
            token: token.filter(|t| !t.is_empty()),
        }
    }

    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    fn contents_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            encode_segment(&self.repository.owner),
            encode_segment(&self.repository.repo),
            encode_path(path)
        )
    }

    /// Perform a contents request and return the raw JSON body.
    fn get_contents(&self, path: &str) -> Result<String, FetchError> {
        let url = self.contents_url(path);
        tracing::debug!(path = %path, "GitHub contents request");

        let mut request = self
            .agent
            .get(&url)
            .query("ref", &self.repository.branch)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", concat!("kb/", env!("CARGO_PKG_VERSION")));
        if let Some(token) = &self.token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        let response = request.call()?;

        let status = response.status().as_u16();
        let remaining = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(FetchError::from_status(
                status,
                remaining.as_deref(),
                error_body,
                path,
            ));
        }

        Ok(body_reader.read_to_string()?)
    }
}

impl ContentSource for GithubSource {
    fn list_directory(&self, path: &str) -> Result<Vec<FileEntry>, FetchError> {
        let body = self.get_contents(path)?;
        Ok(match serde_json::from_str(&body)? {
            Listing::Many(entries) => entries,
            Listing::One(entry) => vec![entry],
        })
    }

    fn get_file(&self, path: &str) -> Result<FileBody, FetchError> {
        let body = self.get_contents(path)?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT_ENCODE_SET).to_string()
}

/// Percent-encode each segment of a slash-separated path.
fn encode_path(path: &str) -> String {
    path.trim_matches('/')
        .split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}
