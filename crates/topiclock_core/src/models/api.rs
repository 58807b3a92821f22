//! Request and response payloads exchanged with the forum host.

use super::claim::{ResourceId, ViewerId};
use serde::{Deserialize, Serialize};

/// Heartbeat tick sent by a viewer's page on an interval.
///
/// The heartbeat channel is shared with other host features, so the
/// topic-lock section is optional and absent sections pass through.
#[derive(Debug, Default, Deserialize)]
pub struct HeartbeatRequest {
    pub topic_lock: Option<PresencePing>,
}

/// Presence section of a heartbeat.
#[derive(Debug, Deserialize)]
pub struct PresencePing {
    pub resource_id: String,
}

/// Heartbeat response; the host may merge it into a larger payload.
#[derive(Debug, Default, Serialize)]
pub struct HeartbeatResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_lock: Option<PresenceAck>,
}

/// Acknowledgment of a processed presence ping.
#[derive(Debug, Serialize)]
pub struct PresenceAck {
    pub resource_id: ResourceId,
    pub outcome: PingOutcomeKind,
    /// Holder of the active claim when it is someone other than the pinger.
    pub locked_by: Option<ViewerId>,
}

/// Wire name of a ping outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PingOutcomeKind {
    Ignored,
    Claimed,
    Held,
    Degraded,
}

/// Response of the lock query used before rendering a resource.
#[derive(Debug, Serialize)]
pub struct LockQueryResponse {
    pub resource_id: ResourceId,
    pub locked_by: Option<ViewerId>,
}

/// Host event emitted after a reply (or edit) was published.
#[derive(Debug, Deserialize)]
pub struct TerminalActionRequest {
    pub actor_id: u64,
    #[serde(default)]
    pub privileged: bool,
}

/// Result of a terminal-action release.
#[derive(Debug, Serialize)]
pub struct TerminalActionResponse {
    pub resource_id: ResourceId,
    pub released: bool,
}
