//! API Module
//!
//! HTTP layer of the webhook server: one receiving endpoint plus a
//! health check.

pub mod error;
pub mod health;
pub mod webhook;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use sitewright_engine::Orchestrator;

/// Shared state handed to every handler
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub secret: String,
}

/// Create the router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(webhook::receive))
        .route("/health", get(health::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
