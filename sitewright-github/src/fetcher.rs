//! SnapshotFetcher implementation
//!
//! The tarball download is the primary strategy: one HTTP round-trip and
//! no local git state. The shallow clone covers the cases where the
//! archive endpoint is unavailable.

use async_trait::async_trait;
use tracing::warn;

use sitewright_core::Repository;
use sitewright_engine::{Snapshot, SnapshotFetcher};

use crate::Client;

#[async_trait]
impl SnapshotFetcher for Client {
    async fn fetch(&self, repository: &Repository, commit: &str) -> anyhow::Result<Snapshot> {
        match self.download_snapshot(repository, commit).await {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                warn!(
                    "{}: tarball download failed ({}), falling back to shallow clone",
                    repository.full_name, err
                );
                Ok(self.clone_snapshot(repository).await?)
            }
        }
    }
}
