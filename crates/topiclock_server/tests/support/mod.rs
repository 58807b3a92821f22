//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use topiclock_server::{
    create_app, AppState, Config, Database, ManualClock, MemoryStore, PresenceTracker,
};

pub(crate) const WINDOW: u64 = 120;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        port: 0,
        db_path: db_path.to_str().expect("db path").to_string(),
        active_window_secs: WINDOW,
        max_body_size: 64 * 1024,
    }
}

/// Server over a temporary redb database and the system clock.
pub(crate) fn setup_test_server() -> (TestServer, TempDir, Arc<Database>) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.db");
    let config = test_config_for_db_path(&db_path);
    let db = Arc::new(Database::new(config.db_path.as_str()).expect("open db"));
    let state = AppState::new(config, db.clone());
    let server = TestServer::new(create_app(state, false)).expect("server");
    (server, temp_dir, db)
}

/// Server over an in-memory store and a manual clock starting at `start`.
pub(crate) fn setup_clocked_server(
    start: u64,
) -> (TestServer, Arc<MemoryStore>, Arc<ManualClock>) {
    let store = Arc::new(MemoryStore::default());
    let clock = Arc::new(ManualClock::new(start));
    let tracker = PresenceTracker::new(store.clone(), clock.clone(), WINDOW);
    let config = test_config_for_db_path(Path::new("/unused"));
    let state = AppState::with_tracker(config, tracker);
    let server = TestServer::new(create_app(state, false)).expect("server");
    (server, store, clock)
}
