//! Sitewright Engine
//!
//! The build orchestration core of sitewright:
//! - Builders: fixed-priority registry of site build strategies
//! - Runner: isolated build execution with combined output capture
//! - Publisher: atomic symlink swap of the served path per repo/branch
//! - Orchestrator: policy gate plus fire-and-forget pipeline dispatch
//!
//! The engine never touches the network itself; snapshot acquisition is
//! injected through the [`SnapshotFetcher`] trait.

pub mod builders;
pub mod command;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod publish;
pub mod runner;
pub mod snapshot;

pub use builders::{Builder, BuilderRegistry};
pub use config::Config;
pub use error::PipelineError;
pub use orchestrator::{Disposition, Orchestrator, SnapshotFetcher};
pub use publish::PublishManager;
pub use runner::{BuildArtifact, BuildRunner};
pub use snapshot::Snapshot;
