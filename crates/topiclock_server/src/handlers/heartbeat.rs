//! Heartbeat HTTP handler.

use crate::{error::HttpError, viewer::Viewer, AppState};
use axum::{extract::State, http::HeaderMap, Json};
use topiclock_core::{
    models::api::{HeartbeatRequest, HeartbeatResponse, PingOutcomeKind, PresenceAck},
    PingOutcome, ResourceId,
};

/// Process one heartbeat tick.
///
/// Heartbeats without a `topic_lock` section pass through untouched. Store
/// failures never fail the heartbeat; they are reported as a `degraded`
/// outcome.
///
/// # Errors
/// Returns a 400 when the resource id is empty.
pub async fn heartbeat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<HeartbeatRequest>,
) -> Result<Json<HeartbeatResponse>, HttpError> {
    let Some(ping) = req.topic_lock else {
        return Ok(Json(HeartbeatResponse::default()));
    };
    let resource_id = ResourceId::parse(&ping.resource_id)?;
    let viewer = Viewer::from_headers(&headers);

    let outcome = state
        .tracker
        .handle_ping(&resource_id, viewer.id, viewer.privileged);
    let (outcome, locked_by) = match outcome {
        PingOutcome::Ignored => (PingOutcomeKind::Ignored, None),
        PingOutcome::Claimed(_) => (PingOutcomeKind::Claimed, None),
        PingOutcome::HeldBy(holder) => (PingOutcomeKind::Held, Some(holder)),
        PingOutcome::Degraded => (PingOutcomeKind::Degraded, None),
    };

    Ok(Json(HeartbeatResponse {
        topic_lock: Some(PresenceAck {
            resource_id,
            outcome,
            locked_by,
        }),
    }))
}
