//! Shallow clone snapshot strategy
//!
//! Fallback for when the tarball download is unavailable. A depth-1 clone
//! is enough: the pipeline only needs the working tree, never history.

use std::process::Command;

use tracing::info;

use sitewright_core::Repository;
use sitewright_engine::Snapshot;

use crate::{Client, GithubError, Result};

impl Client {
    /// Clones the repository's default state at depth 1 into a fresh
    /// temporary directory owned by the returned snapshot.
    pub async fn clone_snapshot(&self, repository: &Repository) -> Result<Snapshot> {
        let dir = tempfile::Builder::new().prefix("sitewright-").tempdir()?;

        let url = match self.api_key() {
            Some(key) => format!("https://{}@github.com/{}.git", key, repository.full_name),
            None => format!("https://github.com/{}.git", repository.full_name),
        };

        let output = Command::new("git")
            .arg("clone")
            .arg("--depth=1")
            .arg(&url)
            .arg(dir.path())
            .output()?;

        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&output.stderr));
        info!(
            "git: {}: cloning repository\n{}",
            repository.full_name,
            log.trim_end()
        );

        if !output.status.success() {
            // The tempdir (and the partial clone) is dropped here.
            return Err(GithubError::CloneFailed { log });
        }

        Ok(Snapshot::new(dir))
    }
}
