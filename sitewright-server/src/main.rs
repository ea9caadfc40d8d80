//! Sitewright Server
//!
//! Webhook-triggered static-site build-and-publish service.
//!
//! Architecture:
//! - Configuration: environment variables, validated once at startup
//! - GitHub client: snapshot acquisition (tarball, shallow-clone fallback)
//! - Engine: builder selection, build execution, atomic publish
//! - API: webhook receiver with HMAC verification, health check
//!
//! The webhook answer is synchronous policy only; builds run in detached
//! tasks after the caller has already been acknowledged.

mod api;
mod signature;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sitewright_engine::{Config, Orchestrator, SnapshotFetcher};
use sitewright_github::Client;

use crate::api::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitewright=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sitewright Server");

    let config = Config::from_env().context("Failed to load configuration")?;
    let secret = config
        .secret
        .clone()
        .context("SITEWRIGHT_SECRET must be set")?;

    info!(
        "Loaded configuration: base_dir={}, branches={:?}",
        config.base_dir.display(),
        config.allowed_branches
    );

    let client = Arc::new(Client::new(config.api_key.clone()));
    let listen_addr = config.listen_addr.clone();

    let orchestrator = Arc::new(Orchestrator::new(
        config,
        client as Arc<dyn SnapshotFetcher>,
    ));

    let app = api::create_router(Arc::new(AppState {
        orchestrator,
        secret,
    }));

    info!("Listening on {}", listen_addr);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Failed to bind to {listen_addr}"))?;

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
