//! Shared test-only helpers for topiclock_core.

use crate::{Database, ManualClock, MemoryStore, PresenceTracker};
use std::sync::Arc;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation, path conversion, or database initialization
/// fails in the test environment.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// Tracker over an in-memory store with a manual clock starting at `start`.
pub(crate) fn memory_tracker(
    start: u64,
    window_secs: u64,
) -> (PresenceTracker, Arc<MemoryStore>, Arc<ManualClock>) {
    let store = Arc::new(MemoryStore::default());
    let clock = Arc::new(ManualClock::new(start));
    let tracker = PresenceTracker::new(store.clone(), clock.clone(), window_secs);
    (tracker, store, clock)
}
