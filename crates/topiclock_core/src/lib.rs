//! Core domain library for topic presence locks (claims, storage, tracker).

/// Clock abstraction used for claim timestamps and expiry.
pub mod clock;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// redb-backed metadata store.
pub mod db;
/// Environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Claim data model and encoding.
pub mod models;
/// Presence lock tracker.
pub mod presence;
/// Key-value store seam and in-memory implementation.
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use constants::*;
pub use db::Database;
pub use error::AppError;
pub use models::claim::{Claim, ClaimState, ResourceId, ViewerId};
pub use presence::{PingOutcome, PresenceTracker};
pub use store::{MemoryStore, MetaStore};
