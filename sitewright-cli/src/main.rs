//! Sitewright CLI
//!
//! One-shot trigger: resolves the head of a branch through the GitHub API
//! and runs the same fetch/build/publish pipeline the webhook server
//! would, synchronously.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitewright_core::{PushEvent, Repository};
use sitewright_engine::{Config, Disposition, Orchestrator, SnapshotFetcher};
use sitewright_github::Client;

#[derive(Parser)]
#[command(name = "sitewright")]
#[command(about = "Build and publish one repository branch by hand", long_about = None)]
struct Cli {
    /// Repository full name, e.g. alice/blog
    full_name: String,

    /// Branch to build; must be on the configured allow-list
    branch: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitewright=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;

    let repository = Repository::from_full_name(&cli.full_name)
        .with_context(|| format!("invalid full name: {}", cli.full_name))?;

    let client = Arc::new(Client::new(config.api_key.clone()));

    let commit = client
        .branch_head(&cli.full_name, &cli.branch)
        .await
        .with_context(|| format!("failed to resolve head of {}/{}", cli.full_name, cli.branch))?;

    let event = PushEvent {
        zen: None,
        after: commit,
        deleted: false,
        ref_name: format!("refs/heads/{}", cli.branch),
        repository,
    };

    let orchestrator = Orchestrator::new(config, client as Arc<dyn SnapshotFetcher>);

    match orchestrator.process(&event).await? {
        Disposition::Rejected(reason) => anyhow::bail!(reason),
        disposition => println!("{}", disposition.message().green()),
    }

    Ok(())
}
