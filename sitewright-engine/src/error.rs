//! Pipeline error taxonomy
//!
//! Every variant is terminal for its triggering event: errors are logged
//! inside the build task and the event is dropped, never retried.

use thiserror::Error;

/// Errors raised by the fetch/select/build/publish pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Snapshot acquisition failed (network, auth, missing ref).
    #[error("snapshot fetch failed: {0}")]
    Fetch(#[source] anyhow::Error),

    /// No registered builder matched the snapshot.
    #[error("no builder supported")]
    NoBuilder,

    /// The selected builder could not be spawned at all.
    #[error("failed to invoke builder {builder}: {source}")]
    Invoke {
        builder: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The selected builder ran and exited with failure; `log` holds the
    /// combined stdout/stderr for diagnosis.
    #[error("builder {builder} failed with {status}")]
    Build {
        builder: &'static str,
        status: std::process::ExitStatus,
        log: String,
    },

    /// Filesystem operation failed while swapping the served target.
    #[error("publish failed: {0}")]
    Publish(#[source] std::io::Error),
}
