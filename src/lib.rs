//! Root crate facade for the topic lock server and core tracker.

pub use topiclock_core::ClaimState;
pub use topiclock_server::{
    config, create_app, db, handlers, models, resolve_bind_address, serve_router, viewer,
    AppError, AppState, Claim, Clock, Config, Database, HttpError, ManualClock, MemoryStore,
    MetaStore, PingOutcome, PresenceTracker, ResourceId, SystemClock, Viewer, ViewerId,
};
