//! Error types for merge-branch

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while resolving targets and talking to the host
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or missing configuration (no target, both targets, bad input)
    #[error("configuration error: {0}")]
    Config(String),

    /// Target branch pattern failed to compile
    #[error("invalid target branch pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Trigger payload does not describe a pushed branch
    #[error("{0}")]
    Precondition(String),

    /// Host reported that a pull request for this head/base already exists
    #[error("a pull request from {head} into {base} already exists")]
    PullRequestExists {
        /// Head branch of the duplicate pull request
        head: String,
        /// Base branch of the duplicate pull request
        base: String,
    },

    /// GitHub API error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic platform error (protocol violations, unexpected payloads)
    #[error("platform error: {0}")]
    Platform(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to read a local file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<octocrab::Error> for Error {
    fn from(e: octocrab::Error) -> Self {
        match e {
            octocrab::Error::GitHub { source, .. } => Self::GitHubApi(format!(
                "{} ({})",
                source.message, source.status_code
            )),
            other => Self::GitHubApi(other.to_string()),
        }
    }
}
