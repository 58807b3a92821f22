//! HTTP request handlers.

/// Heartbeat (presence ping) endpoint.
pub mod heartbeat;
/// Lock query and terminal-action endpoints.
pub mod lock;

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
