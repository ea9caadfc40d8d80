//! Commit tarball download and extraction
//!
//! GitHub serves a commit snapshot as a gzipped tarball whose entries all
//! live under one `<owner>-<repo>-<sha>/` directory. Extraction strips
//! exactly that leading component and preserves each entry's permission
//! bits and symlink target, so the snapshot is a faithful working tree.

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::info;

use sitewright_core::Repository;
use sitewright_engine::Snapshot;

use crate::{Client, GithubError, Result};

impl Client {
    /// Downloads the tarball for one commit and unpacks it into a fresh
    /// temporary directory owned by the returned snapshot.
    pub async fn download_snapshot(
        &self,
        repository: &Repository,
        commit: &str,
    ) -> Result<Snapshot> {
        info!(
            "{}: downloading commit: {}",
            repository.full_name, commit
        );

        let url = format!(
            "{}/repos/{}/tarball/{}",
            self.base_url(),
            repository.full_name,
            commit
        );

        let response = self.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GithubError::api_error(status.as_u16(), message));
        }

        let bytes = response.bytes().await?;

        let dir = tempfile::Builder::new().prefix("sitewright-").tempdir()?;
        unpack_snapshot(bytes.as_ref(), dir.path())?;
        Ok(Snapshot::new(dir))
    }
}

/// Unpacks a gzipped tarball into `dest`, stripping the single leading
/// path component every entry shares. Entries that consist of nothing but
/// that component (pax headers and the root directory itself) are
/// skipped.
pub fn unpack_snapshot<R: Read>(reader: R, dest: &Path) -> std::io::Result<()> {
    let mut archive = Archive::new(GzDecoder::new(reader));
    archive.set_preserve_permissions(true);

    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?;

        let stripped: PathBuf = path.components().skip(1).collect();
        if stripped.as_os_str().is_empty() {
            continue;
        }

        let dest_path = dest.join(&stripped);
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        entry.unpack(&dest_path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    /// Builds a gzipped tarball shaped like a GitHub commit snapshot.
    fn snapshot_tarball() -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = tar::Builder::new(encoder);

        // Top-level-only entry, as GitHub emits for pax metadata.
        let mut header = tar::Header::new_gnu();
        header.set_size(2);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "pax_global_header", &b"xx"[..])
            .unwrap();

        let mut header = tar::Header::new_gnu();
        header.set_size(6);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, "alice-blog-d6a5b9e/blogcfile", &b"[site]"[..])
            .unwrap();

        let mut header = tar::Header::new_gnu();
        header.set_size(15);
        header.set_mode(0o755);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                "alice-blog-d6a5b9e/bin/generate.sh",
                &b"#!/bin/sh\ntrue\n"[..],
            )
            .unwrap();

        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_cksum();
        builder
            .append_link(&mut header, "alice-blog-d6a5b9e/latest", "bin/generate.sh")
            .unwrap();

        builder.into_inner().unwrap().finish().unwrap()
    }

    #[test]
    fn test_unpack_strips_one_leading_component() {
        let dest = tempfile::tempdir().unwrap();
        unpack_snapshot(&snapshot_tarball()[..], dest.path()).unwrap();

        assert!(dest.path().join("blogcfile").is_file());
        assert!(dest.path().join("bin/generate.sh").is_file());
        assert!(!dest.path().join("alice-blog-d6a5b9e").exists());
    }

    #[test]
    fn test_unpack_skips_top_level_only_entries() {
        let dest = tempfile::tempdir().unwrap();
        unpack_snapshot(&snapshot_tarball()[..], dest.path()).unwrap();

        assert!(!dest.path().join("pax_global_header").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unpack_preserves_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dest = tempfile::tempdir().unwrap();
        unpack_snapshot(&snapshot_tarball()[..], dest.path()).unwrap();

        let script = dest.path().join("bin/generate.sh").metadata().unwrap();
        assert_eq!(script.permissions().mode() & 0o777, 0o755);

        let config = dest.path().join("blogcfile").metadata().unwrap();
        assert_eq!(config.permissions().mode() & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_unpack_preserves_symlink_target() {
        let dest = tempfile::tempdir().unwrap();
        unpack_snapshot(&snapshot_tarball()[..], dest.path()).unwrap();

        let target = std::fs::read_link(dest.path().join("latest")).unwrap();
        assert_eq!(target, Path::new("bin/generate.sh"));
    }

    #[tokio::test]
    async fn test_download_snapshot_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/alice/blog/tarball/d6a5b9e")
            .with_status(200)
            .with_header("content-type", "application/x-gzip")
            .with_body(snapshot_tarball())
            .create_async()
            .await;

        let client = Client::with_base_url(None, server.url());
        let repository = Repository::from_full_name("alice/blog").unwrap();
        let snapshot = client
            .download_snapshot(&repository, "d6a5b9e")
            .await
            .unwrap();

        assert!(snapshot.path().join("blogcfile").is_file());
    }

    #[tokio::test]
    async fn test_download_snapshot_propagates_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/repos/alice/blog/tarball/missing")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;

        let client = Client::with_base_url(None, server.url());
        let repository = Repository::from_full_name("alice/blog").unwrap();
        let err = client
            .download_snapshot(&repository, "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, GithubError::Api { status: 404, .. }));
    }
}
