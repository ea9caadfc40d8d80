//! Webhook API Handler
//!
//! Receives GitHub push/ping deliveries, verifies the HMAC signature over
//! the raw body, and hands qualifying events to the orchestrator. The
//! response is always decided synchronously; build work continues in a
//! detached task after the 202 goes out.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tracing::info;

use sitewright_core::PushEvent;

use crate::api::error::{ApiError, ApiResult};
use crate::api::AppState;
use crate::signature;

/// POST /
/// GitHub webhook receiver
pub async fn receive(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, String)> {
    let event_kind = headers
        .get("X-GitHub-Event")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("missing GitHub event".to_string()))?;

    if event_kind != "push" && event_kind != "ping" {
        return Err(ApiError::BadRequest(format!(
            "invalid event ({event_kind}); only push and ping are supported"
        )));
    }

    let signature_header = headers
        .get("X-Hub-Signature-256")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest("missing GitHub signature".to_string()))?;

    if !signature::verify(state.secret.as_bytes(), &body, signature_header) {
        return Err(ApiError::BadRequest(
            "failed to validate HMAC signature".to_string(),
        ));
    }

    let event: PushEvent = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("invalid JSON".to_string()))?;

    if event.is_ping() {
        info!(
            "{}: ping: {}",
            event.repository.full_name,
            event.zen.as_deref().unwrap_or("")
        );
        return Ok((StatusCode::OK, "PONG\n".to_string()));
    }

    let disposition = state.orchestrator.dispatch(event);
    Ok((
        StatusCode::ACCEPTED,
        format!("{}\n", disposition.message().to_uppercase()),
    ))
}
