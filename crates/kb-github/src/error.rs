//! Error types for content fetching.

/// Error from a content fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    /// Upstream refused the request because the API quota is exhausted.
    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    /// HTTP response error (server returned error status).
    #[error("HTTP error: {status} - {body}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Nothing exists at the requested path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response body is not the expected JSON.
    #[error("JSON error")]
    Json(#[from] serde_json::Error),

    /// File body is not valid base64.
    #[error("Invalid base64 content")]
    Decode(#[from] base64::DecodeError),

    /// Decoded file body is not UTF-8.
    #[error("File content is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The path names a directory or another non-file entry.
    #[error("Not a file: {0}")]
    NotAFile(String),
}

impl FetchError {
    /// Whether the failure signals rate limiting.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }

    /// Classify an error status returned by the GitHub API.
    ///
    /// Rate limiting is reported as 429, or as 403 with either an exhausted
    /// `x-ratelimit-remaining` header or a body mentioning the rate limit.
    #[must_use]
    pub fn from_status(status: u16, remaining: Option<&str>, body: String, path: &str) -> Self {
        let rate_limited = status == 429
            || (status == 403
                && (remaining.is_some_and(|r| r.trim() == "0")
                    || body.to_lowercase().contains("rate limit")));
        if rate_limited {
            Self::RateLimited
        } else if status == 404 {
            Self::NotFound(path.to_owned())
        } else {
            Self::HttpResponse { status, body }
        }
    }
}
