//! Data models for claims and the HTTP surface.

/// Request and response payloads for heartbeat, lock query, and release hooks.
pub mod api;
/// Claim record, identifiers, and stored-value encoding.
pub mod claim;
