//! Event orchestration
//!
//! Sequences fetch, selection, build, and publish for one verified push
//! event. Policy rejections (disallowed branch, missing credential for a
//! private repository) are decided synchronously before any task is
//! spawned; everything after acceptance is fire-and-forget, with errors
//! resolved locally by logging. A failed fetch, selection, or build never
//! touches the currently served artifact.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{error, info, warn};

use sitewright_core::{PushEvent, Repository};

use crate::builders::BuilderRegistry;
use crate::config::Config;
use crate::error::PipelineError;
use crate::publish::PublishManager;
use crate::runner::{BuildArtifact, BuildRunner};
use crate::snapshot::Snapshot;

/// Produces a populated working tree for one commit.
///
/// Implementations may clone, download an archive, or anything else; the
/// engine only requires the resulting directory.
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    async fn fetch(&self, repository: &Repository, commit: &str) -> Result<Snapshot>;
}

/// Synchronous answer to the triggering caller, decided before any build
/// work starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// A build task was spawned (or run to completion in one-shot mode).
    Accepted,
    /// The ref was deleted; the served path is being cleaned up.
    BranchDeleted,
    /// Policy rejection; no task was spawned and nothing was touched.
    Rejected(String),
}

impl Disposition {
    pub fn message(&self) -> &str {
        match self {
            Disposition::Accepted => "accepted",
            Disposition::BranchDeleted => "branch deleted",
            Disposition::Rejected(reason) => reason,
        }
    }
}

enum Action {
    Rejected(String),
    Cleanup(String),
    Build(String),
}

/// Composes registry, runner, and publisher per triggering event
pub struct Orchestrator {
    config: Config,
    fetcher: Arc<dyn SnapshotFetcher>,
    registry: BuilderRegistry,
    runner: BuildRunner,
    publisher: PublishManager,
}

impl Orchestrator {
    /// Creates an orchestrator with the standard builder chain.
    pub fn new(config: Config, fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        Self::with_registry(config, fetcher, BuilderRegistry::standard())
    }

    /// Creates an orchestrator with an explicit builder chain.
    pub fn with_registry(
        config: Config,
        fetcher: Arc<dyn SnapshotFetcher>,
        registry: BuilderRegistry,
    ) -> Self {
        let runner = BuildRunner::new(&config.base_dir);
        let publisher = PublishManager::new(&config.base_dir);
        Self {
            config,
            fetcher,
            registry,
            runner,
            publisher,
        }
    }

    /// Decides the event synchronously and, when it qualifies, spawns a
    /// detached task for the cleanup or build work. The returned
    /// disposition is what the webhook caller sees; it never waits for
    /// the task.
    pub fn dispatch(self: &Arc<Self>, event: PushEvent) -> Disposition {
        let disposition = match self.evaluate(&event) {
            Action::Rejected(reason) => return Disposition::Rejected(reason),
            Action::Cleanup(_) => Disposition::BranchDeleted,
            Action::Build(_) => Disposition::Accepted,
        };

        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(err) = this.process(&event).await {
                error!("{}: {}", event.repository.full_name, err);
            }
        });

        disposition
    }

    /// Runs the whole pipeline for one event inline. Used by the spawned
    /// task and by the one-shot CLI trigger.
    pub async fn process(&self, event: &PushEvent) -> Result<Disposition, PipelineError> {
        match self.evaluate(event) {
            Action::Rejected(reason) => Ok(Disposition::Rejected(reason)),
            Action::Cleanup(branch) => {
                self.publisher.cleanup(&event.repository, &branch).await?;
                Ok(Disposition::BranchDeleted)
            }
            Action::Build(branch) => {
                self.build_and_publish(event, &branch).await?;
                Ok(Disposition::Accepted)
            }
        }
    }

    fn evaluate(&self, event: &PushEvent) -> Action {
        let full_name = &event.repository.full_name;
        info!(
            "{}: processing push: {} ({})",
            full_name,
            event.ref_name,
            event.branch().unwrap_or("")
        );

        let branch = match event.branch() {
            Some(branch) if self.config.branch_allowed(branch) => branch.to_string(),
            _ => {
                warn!(
                    "{}: invalid ref ({}), branch is not allowed",
                    full_name, event.ref_name
                );
                return Action::Rejected("unsupported branch".to_string());
            }
        };

        if event.deleted {
            info!(
                "{}: ref was deleted ({}), branch will be cleaned up",
                full_name, event.ref_name
            );
            return Action::Cleanup(branch);
        }

        if event.repository.private && self.config.api_key.is_none() {
            warn!("{}: private repository and no API key configured", full_name);
            return Action::Rejected("missing credential for private repository".to_string());
        }

        Action::Build(branch)
    }

    async fn build_and_publish(
        &self,
        event: &PushEvent,
        branch: &str,
    ) -> Result<(), PipelineError> {
        let snapshot = self
            .fetcher
            .fetch(&event.repository, &event.after)
            .await
            .map_err(PipelineError::Fetch)?;

        let built = self.build(&snapshot, event);
        // The working tree is gone before publish either way.
        drop(snapshot);
        let artifact = built?;

        self.publisher
            .publish(&event.repository, branch, &artifact)
            .await
    }

    fn build(&self, snapshot: &Snapshot, event: &PushEvent) -> Result<BuildArtifact, PipelineError> {
        let builder = self
            .registry
            .select(snapshot.path())
            .ok_or(PipelineError::NoBuilder)?;
        self.runner.run(builder, snapshot.path(), &event.after)
    }
}
