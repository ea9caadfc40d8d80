//! Atomic publish and cleanup of served paths
//!
//! The served path for a repo/branch is always either absent or a relative
//! symlink into the builds tree, so readers never observe a half-written
//! artifact. Swapping is link-and-unlink rather than a single atomic
//! replacement; the window where the target is briefly absent is bounded
//! by serializing all swaps for one target through a per-target lock.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::info;

use sitewright_core::Repository;

use crate::error::PipelineError;
use crate::runner::BuildArtifact;

/// Swaps served symlinks and reclaims replaced artifacts
pub struct PublishManager {
    served_root: PathBuf,
    locks: Mutex<HashMap<PathBuf, Arc<tokio::sync::Mutex<()>>>>,
}

impl PublishManager {
    /// Creates a manager serving under `<base>/served`.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            served_root: base_dir.join("served"),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Deterministic served path for a repo/branch:
    /// `<base>/served/<owner>/<repo>--<branch>`.
    pub fn target_path(&self, repository: &Repository, branch: &str) -> PathBuf {
        self.served_root
            .join(&repository.owner.login)
            .join(format!("{}--{}", repository.name, branch))
    }

    /// Makes the artifact the served content for the repo/branch. The
    /// previously served artifact directory is removed first; the new
    /// link is created relative to the target's parent so the served
    /// tree stays relocatable.
    pub async fn publish(
        &self,
        repository: &Repository,
        branch: &str,
        artifact: &BuildArtifact,
    ) -> Result<(), PipelineError> {
        let target = self.target_path(repository, branch);
        let guard = self.lock_for(&target);
        let _held = guard.lock().await;

        remove_current(&target).map_err(PipelineError::Publish)?;

        let parent = target
            .parent()
            .ok_or_else(|| PipelineError::Publish(io::Error::other("target path has no parent")))?;
        fs::create_dir_all(parent).map_err(PipelineError::Publish)?;

        let link_dest = Path::new("../../builds").join(artifact.name());
        info!(
            "{}: creating symlink {} -> {}",
            repository.full_name,
            target.display(),
            link_dest.display()
        );
        symlink(&link_dest, &target).map_err(PipelineError::Publish)?;

        Ok(())
    }

    /// Removes the served path and its artifact directory; a no-op when
    /// nothing is currently served. Used for branch-deletion events.
    pub async fn cleanup(
        &self,
        repository: &Repository,
        branch: &str,
    ) -> Result<(), PipelineError> {
        let target = self.target_path(repository, branch);
        let guard = self.lock_for(&target);
        let _held = guard.lock().await;

        info!("{}: cleaning up {}", repository.full_name, target.display());
        remove_current(&target).map_err(PipelineError::Publish)
    }

    /// Per-target lock so concurrent swaps of one served path cannot
    /// interleave. Ordering between events stays arrival order here.
    fn lock_for(&self, target: &Path) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(target.to_path_buf()).or_default().clone()
    }
}

/// Removes the current target link and the artifact directory it points
/// at. Absent target means the removal half is a no-op.
fn remove_current(target: &Path) -> io::Result<()> {
    let dest = match fs::read_link(target) {
        Ok(dest) => dest,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err),
    };

    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let artifact = if dest.is_absolute() {
        dest
    } else {
        parent.join(dest)
    };

    // A dangling link has no artifact left to reclaim.
    if let Ok(resolved) = fs::canonicalize(&artifact) {
        fs::remove_dir_all(&resolved)?;
    }
    fs::remove_file(target)
}

#[cfg(unix)]
fn symlink(dest: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(dest, target)
}
