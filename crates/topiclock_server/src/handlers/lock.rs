//! Lock query and release HTTP handlers.

use crate::{error::HttpError, viewer::Viewer, AppState};
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use topiclock_core::{
    models::api::{LockQueryResponse, TerminalActionRequest, TerminalActionResponse},
    ResourceId, ViewerId,
};

/// Report who else is viewing a resource.
///
/// Only privileged viewers are told about claims; everyone else always gets
/// `locked_by: null` without touching the store.
///
/// # Errors
/// Returns a 400 for an empty id and a 503 when the store is unavailable.
pub async fn get_lock(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<LockQueryResponse>, HttpError> {
    let resource_id = ResourceId::parse(&id)?;
    let viewer = Viewer::from_headers(&headers);
    let locked_by = if viewer.privileged {
        state.tracker.query_lock(&resource_id, viewer.id)?
    } else {
        None
    };
    Ok(Json(LockQueryResponse {
        resource_id,
        locked_by,
    }))
}

/// Host hook fired after a reply or edit was published.
///
/// The actor comes from the request body rather than the caller's headers:
/// the host reports the author of the published reply.
///
/// # Errors
/// Returns a 400 for an empty id and a 503 when the store is unavailable.
pub async fn terminal_action(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<TerminalActionRequest>,
) -> Result<Json<TerminalActionResponse>, HttpError> {
    let resource_id = ResourceId::parse(&id)?;
    let released = state.tracker.release_on_terminal_action(
        &resource_id,
        ViewerId::new(req.actor_id),
        req.privileged,
    )?;
    Ok(Json(TerminalActionResponse {
        resource_id,
        released,
    }))
}
