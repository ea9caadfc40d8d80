//! Source snapshots
//!
//! A snapshot is a local working tree for one commit, owned exclusively by
//! the pipeline run that fetched it. Dropping the snapshot deletes the
//! directory, so a run cleans up after itself whether the build succeeded
//! or failed.

use std::path::Path;
use tempfile::TempDir;

/// An ephemeral working tree for a single commit
#[derive(Debug)]
pub struct Snapshot {
    dir: TempDir,
}

impl Snapshot {
    /// Wraps a populated temporary directory.
    pub fn new(dir: TempDir) -> Self {
        Self { dir }
    }

    /// Root of the working tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();
        std::fs::write(path.join("blogcfile"), "[settings]\n").unwrap();

        let snapshot = Snapshot::new(dir);
        assert!(snapshot.path().join("blogcfile").exists());

        drop(snapshot);
        assert!(!path.exists());
    }
}
