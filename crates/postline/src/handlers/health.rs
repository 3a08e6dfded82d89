//! Health check endpoints for Kubernetes-style probes.
//!
//! - `/healthz` - liveness, no checks
//! - `/readyz` - readiness, round-trips the primary store

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /healthz - Basic liveness probe.
pub async fn healthz() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// GET /readyz - Readiness probe.
///
/// Returns 503 while the primary store cannot answer a count query.
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store.count_posts().await {
        Ok(posts) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "posts": posts })),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "error": err.to_string() })),
            )
        }
    }
}
