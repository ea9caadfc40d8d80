//! Error types for the GitHub client

use thiserror::Error;

/// Result type alias for GitHub operations
pub type Result<T> = std::result::Result<T, GithubError>;

/// Errors that can occur while talking to GitHub or materializing a
/// snapshot from it
#[derive(Debug, Error)]
pub enum GithubError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// The requested ref does not resolve to a commit
    #[error("invalid reference: {0}")]
    InvalidRef(String),

    /// Filesystem or archive-extraction failure
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// git clone exited with failure; `log` holds its combined output
    #[error("git clone failed:\n{log}")]
    CloneFailed { log: String },
}

impl GithubError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}
