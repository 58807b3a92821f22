//! Shared constants used across topiclock crates.

/// Default API port for the topic lock server.
pub const DEFAULT_PORT: u16 = 38412;

/// Default window, in seconds, during which a claim counts as active.
pub const DEFAULT_ACTIVE_WINDOW_SECS: u64 = 120;

/// Default maximum request body size accepted by the API layer.
pub const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;

/// Key namespace for claims in the host metadata store.
pub const LOCK_KEY_PREFIX: &str = "lock:";

/// Capability that marks a viewer as privileged (allowed to hold claims).
pub const MODERATE_CAPABILITY: &str = "moderate";
