//! Build execution
//!
//! Runs one selected builder against a snapshot, directing its output to a
//! fresh directory under the builds root. The output directory is named by
//! the build id (`<commit>-<unix seconds>`); an already-taken name gets a
//! trailing `-` so two builds of the same commit in the same second never
//! write into each other's tree.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::builders::Builder;
use crate::error::PipelineError;

/// A finished build's output directory, immutable once written
#[derive(Debug, Clone)]
pub struct BuildArtifact {
    dir: PathBuf,
}

impl BuildArtifact {
    pub(crate) fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Absolute path of the artifact directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Directory name under the builds root (the build id).
    pub fn name(&self) -> &std::ffi::OsStr {
        self.dir.file_name().expect("artifact path has a final component")
    }
}

/// Executes builders into isolated output directories
#[derive(Debug, Clone)]
pub struct BuildRunner {
    builds_root: PathBuf,
}

impl BuildRunner {
    /// Creates a runner writing under `<base>/builds`.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            builds_root: base_dir.join("builds"),
        }
    }

    /// Runs the builder with the snapshot as working directory and a fresh
    /// output directory bound to `OUTPUT_DIR`. Combined stdout/stderr is
    /// logged whether or not the build succeeds. On failure the partial
    /// output directory is abandoned in place, never published.
    pub fn run(
        &self,
        builder: &dyn Builder,
        snapshot: &Path,
        commit: &str,
    ) -> Result<BuildArtifact, PipelineError> {
        let output_dir = self.output_dir_for(commit);

        let output = builder
            .build(snapshot, &output_dir)
            .map_err(|source| PipelineError::Invoke {
                builder: builder.binary(),
                source,
            })?;

        let log = combined_log(&output.stdout, &output.stderr);
        info!(
            "{}: running: {}\n{}",
            builder.binary(),
            builder.command_line(snapshot, &output_dir),
            log.trim_end()
        );

        if !output.status.success() {
            return Err(PipelineError::Build {
                builder: builder.binary(),
                status: output.status,
                log,
            });
        }

        Ok(BuildArtifact::new(output_dir))
    }

    fn output_dir_for(&self, commit: &str) -> PathBuf {
        let build_id = format!("{}-{}", commit, chrono::Utc::now().timestamp());
        disambiguate(self.builds_root.join(build_id))
    }
}

/// Appends `-` to the candidate path until it names nothing on disk.
fn disambiguate(candidate: PathBuf) -> PathBuf {
    let mut path = candidate.into_os_string();
    loop {
        if !Path::new(&path).exists() {
            return PathBuf::from(path);
        }
        path.push("-");
    }
}

fn combined_log(stdout: &[u8], stderr: &[u8]) -> String {
    let mut log = String::from_utf8_lossy(stdout).into_owned();
    log.push_str(&String::from_utf8_lossy(stderr));
    log
}
