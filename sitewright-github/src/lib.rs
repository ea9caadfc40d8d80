//! Sitewright GitHub client
//!
//! Infrastructure adapter for everything the pipeline needs from GitHub:
//! resolving a branch head to a commit, and materializing a commit
//! snapshot either by downloading the commit tarball (primary) or by a
//! shallow git clone (fallback). Implements the engine's
//! [`SnapshotFetcher`](sitewright_engine::SnapshotFetcher) trait.

pub mod archive;
pub mod clone;
pub mod error;
mod fetcher;
mod refs;

pub use error::{GithubError, Result};

const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// HTTP client for the GitHub REST API
#[derive(Debug, Clone)]
pub struct Client {
    /// Base URL of the API (overridable for tests and GHE deployments)
    base_url: String,
    /// API token; requests go out unauthenticated when absent
    api_key: Option<String>,
    /// HTTP client instance
    client: reqwest::Client,
}

impl Client {
    /// Create a client against the public GitHub API.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom API base URL.
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    /// Get the configured API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a credential is configured.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Builds a GET request with the token header applied when present.
    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, "sitewright");
        match &self.api_key {
            Some(key) => request.header(reqwest::header::AUTHORIZATION, format!("token {key}")),
            None => request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = Client::with_base_url(None, "https://github.example.com/api/");
        assert_eq!(client.base_url(), "https://github.example.com/api");
    }

    #[test]
    fn test_client_credential_presence() {
        assert!(!Client::new(None).has_credential());
        assert!(Client::new(Some("t0ken".to_string())).has_credential());
    }
}
