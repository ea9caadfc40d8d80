//! Push event domain types
//!
//! These mirror the fields of a GitHub push/ping webhook payload that the
//! service acts on. Everything else in the payload is ignored during
//! deserialization.

use serde::{Deserialize, Serialize};

/// Repository owner as reported by the forge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// Repository identity, immutable for the lifetime of an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub private: bool,
    pub owner: Owner,
}

impl Repository {
    /// Builds a repository identity from an `owner/name` string.
    ///
    /// Used by the CLI trigger, where no webhook payload exists.
    pub fn from_full_name(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            full_name: full_name.to_string(),
            private: false,
            owner: Owner {
                login: owner.to_string(),
            },
        })
    }
}

/// A push (or ping) notification, created once per incoming webhook and
/// consumed once by the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    /// Ping payloads carry a zen string and nothing to build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zen: Option<String>,
    /// Commit id of the head after the push.
    #[serde(default)]
    pub after: String,
    #[serde(default)]
    pub deleted: bool,
    /// Full ref name, e.g. `refs/heads/master`.
    #[serde(rename = "ref", default)]
    pub ref_name: String,
    pub repository: Repository,
}

impl PushEvent {
    /// Returns the branch name for a `refs/heads/*` ref, `None` for tags
    /// and any other ref namespace.
    pub fn branch(&self) -> Option<&str> {
        self.ref_name.strip_prefix("refs/heads/")
    }

    /// Whether this is a ping notification rather than a push.
    pub fn is_ping(&self) -> bool {
        self.zen.is_some()
    }
}
