use super::*;
use crate::test_support::memory_tracker;
use crate::ManualClock;

const WINDOW: u64 = 120;

fn thread(id: &str) -> ResourceId {
    ResourceId::parse(id).expect("resource id")
}

fn viewer(id: u64) -> ViewerId {
    ViewerId::new(id)
}

/// Store whose every call fails, for degraded-path coverage.
struct BrokenStore;

impl MetaStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
        Err(AppError::StoreUnavailable("store offline".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), AppError> {
        Err(AppError::StoreUnavailable("store offline".to_string()))
    }

    fn delete(&self, _key: &str) -> Result<bool, AppError> {
        Err(AppError::StoreUnavailable("store offline".to_string()))
    }
}

#[test]
fn unclaimed_resource_reports_no_lock() {
    let (tracker, _store, _clock) = memory_tracker(1_000, WINDOW);
    for requester in [0, 1, 99] {
        assert_eq!(
            tracker.check_lock(&thread("5"), viewer(requester)).expect("check"),
            None
        );
    }
    assert_eq!(tracker.claim_state(&thread("5")).expect("state"), ClaimState::Absent);
}

#[test]
fn owner_is_invisible_to_itself_but_visible_to_others() {
    let (tracker, _store, clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    tracker.set_lock(&r, viewer(1)).expect("set");

    clock.advance(WINDOW - 1);
    assert_eq!(tracker.check_lock(&r, viewer(1)).expect("check"), None);
    assert_eq!(
        tracker.check_lock(&r, viewer(2)).expect("check"),
        Some(viewer(1))
    );
    assert_eq!(
        tracker.query_lock(&r, viewer(2)).expect("query"),
        Some(viewer(1))
    );
}

#[test]
fn claim_expires_once_window_elapses() {
    let (tracker, _store, clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    tracker.set_lock(&r, viewer(1)).expect("set");

    clock.advance(WINDOW);
    for requester in [1, 2, 3] {
        assert_eq!(tracker.check_lock(&r, viewer(requester)).expect("check"), None);
    }
    assert!(matches!(
        tracker.claim_state(&r).expect("state"),
        ClaimState::Expired(_)
    ));
}

#[test]
fn first_claimer_wins_within_window() {
    let (tracker, store, clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");

    let first = tracker.handle_ping(&r, viewer(1), true);
    assert!(matches!(first, PingOutcome::Claimed(ref claim) if claim.viewer_id == viewer(1)));

    clock.advance(10);
    let second = tracker.handle_ping(&r, viewer(2), true);
    assert_eq!(second, PingOutcome::HeldBy(viewer(1)));
    assert_eq!(store.get("lock:5").expect("get").as_deref(), Some("1000:1"));
}

#[test]
fn owner_ping_refreshes_its_own_claim() {
    let (tracker, store, clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    tracker.handle_ping(&r, viewer(1), true);

    clock.advance(100);
    let refreshed = tracker.handle_ping(&r, viewer(1), true);
    assert!(matches!(refreshed, PingOutcome::Claimed(ref claim) if claim.claimed_at == 1_100));
    assert_eq!(store.get("lock:5").expect("get").as_deref(), Some("1100:1"));

    // Still active for others past the original window thanks to the refresh.
    clock.advance(100);
    assert_eq!(
        tracker.check_lock(&r, viewer(2)).expect("check"),
        Some(viewer(1))
    );
}

#[test]
fn expired_claim_is_reclaimed_by_next_pinger() {
    let (tracker, store, clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    tracker.handle_ping(&r, viewer(1), true);

    clock.advance(WINDOW + 5);
    let outcome = tracker.handle_ping(&r, viewer(2), true);
    assert!(matches!(outcome, PingOutcome::Claimed(ref claim) if claim.viewer_id == viewer(2)));
    assert_eq!(store.get("lock:5").expect("get").as_deref(), Some("1125:2"));
}

#[test]
fn release_by_owner_clears_claim_even_after_expiry() {
    let (tracker, store, clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    tracker.set_lock(&r, viewer(1)).expect("set");

    clock.advance(WINDOW * 3);
    assert!(tracker
        .release_on_terminal_action(&r, viewer(1), true)
        .expect("release"));
    assert_eq!(store.get("lock:5").expect("get"), None);
    assert_eq!(tracker.check_lock(&r, viewer(2)).expect("check"), None);
}

#[test]
fn release_by_owner_within_window() {
    let (tracker, _store, _clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    tracker.set_lock(&r, viewer(1)).expect("set");

    assert!(tracker
        .release_on_terminal_action(&r, viewer(1), true)
        .expect("release"));
    assert_eq!(tracker.claim_state(&r).expect("state"), ClaimState::Absent);
}

#[test]
fn release_by_other_actor_is_noop() {
    let (tracker, store, _clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    tracker.set_lock(&r, viewer(1)).expect("set");

    assert!(!tracker
        .release_on_terminal_action(&r, viewer(2), true)
        .expect("release"));
    assert_eq!(store.get("lock:5").expect("get").as_deref(), Some("1000:1"));
    assert_eq!(
        tracker.check_lock(&r, viewer(2)).expect("check"),
        Some(viewer(1))
    );
}

#[test]
fn release_without_claim_or_privilege_is_noop() {
    let (tracker, store, _clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    assert!(!tracker
        .release_on_terminal_action(&r, viewer(1), true)
        .expect("release on absent"));

    tracker.set_lock(&r, viewer(1)).expect("set");
    assert!(!tracker
        .release_on_terminal_action(&r, viewer(1), false)
        .expect("unprivileged release"));
    assert_eq!(store.get("lock:5").expect("get").as_deref(), Some("1000:1"));
}

#[test]
fn non_privileged_ping_never_creates_claim() {
    let (tracker, store, clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    assert_eq!(tracker.handle_ping(&r, viewer(3), false), PingOutcome::Ignored);
    assert!(store.is_empty().expect("empty"));

    // Expired prior claim stays as-is too.
    tracker.set_lock(&r, viewer(1)).expect("set");
    clock.advance(WINDOW * 2);
    assert_eq!(tracker.handle_ping(&r, viewer(3), false), PingOutcome::Ignored);
    assert_eq!(store.get("lock:5").expect("get").as_deref(), Some("1000:1"));
}

#[test]
fn anonymous_set_lock_fails_and_keeps_existing_claim() {
    let (tracker, store, _clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");
    assert!(matches!(
        tracker.set_lock(&r, ViewerId::ANONYMOUS),
        Err(AppError::NoViewer)
    ));
    assert!(store.is_empty().expect("empty"));

    tracker.set_lock(&r, viewer(4)).expect("set");
    assert!(matches!(
        tracker.set_lock(&r, ViewerId::ANONYMOUS),
        Err(AppError::NoViewer)
    ));
    assert_eq!(store.get("lock:5").expect("get").as_deref(), Some("1000:4"));
    assert_eq!(
        tracker.handle_ping(&r, ViewerId::ANONYMOUS, true),
        PingOutcome::Ignored
    );
}

#[test]
fn malformed_and_zero_claims_read_as_unclaimed() {
    let (tracker, store, _clock) = memory_tracker(1_000, WINDOW);
    let r = thread("5");

    for raw in ["garbage", "0:7", ":7"] {
        store.set("lock:5", raw).expect("seed");
        assert_eq!(
            tracker.check_lock(&r, viewer(1)).expect("check"),
            None,
            "raw: {:?}",
            raw
        );
    }

    // A malformed value is overwritten by the next privileged ping.
    store.set("lock:5", "garbage").expect("seed");
    assert!(matches!(
        tracker.handle_ping(&r, viewer(1), true),
        PingOutcome::Claimed(_)
    ));
    assert_eq!(store.get("lock:5").expect("get").as_deref(), Some("1000:1"));
}

#[test]
fn ownerless_claim_does_not_block_a_moderator() {
    for raw in ["990", "995:abc", "995:", "995:0"] {
        let (tracker, store, _clock) = memory_tracker(1_000, WINDOW);
        let r = thread("5");
        store.set("lock:5", raw).expect("seed");
        assert_eq!(
            tracker.check_lock(&r, viewer(1)).expect("check"),
            None,
            "raw: {:?}",
            raw
        );
        assert_eq!(tracker.query_lock(&r, viewer(2)).expect("query"), None);
        assert!(!tracker
            .release_on_terminal_action(&r, viewer(1), true)
            .expect("release"));

        match tracker.handle_ping(&r, viewer(1), true) {
            PingOutcome::Claimed(claim) => assert_eq!(claim.viewer_id, viewer(1)),
            other => panic!("expected claim for {:?}, got {:?}", raw, other),
        }
        assert_eq!(store.get("lock:5").expect("get").as_deref(), Some("1000:1"));
    }
}

#[test]
fn store_failures_degrade_ping_and_propagate_elsewhere() {
    let tracker = PresenceTracker::new(
        Arc::new(BrokenStore),
        Arc::new(ManualClock::new(1_000)),
        WINDOW,
    );
    let r = thread("5");
    assert_eq!(tracker.handle_ping(&r, viewer(1), true), PingOutcome::Degraded);
    assert_eq!(tracker.handle_ping(&r, viewer(1), false), PingOutcome::Ignored);

    let err = tracker.check_lock(&r, viewer(1)).expect_err("check fails");
    assert!(err.is_store_failure());
    let err = tracker
        .release_on_terminal_action(&r, viewer(1), true)
        .expect_err("release fails");
    assert!(err.is_store_failure());
    assert!(tracker.set_lock(&r, viewer(1)).expect_err("set fails").is_store_failure());
}

#[test]
fn claims_are_scoped_per_resource() {
    let (tracker, _store, _clock) = memory_tracker(1_000, WINDOW);
    tracker.handle_ping(&thread("5"), viewer(1), true);
    tracker.handle_ping(&thread("6"), viewer(2), true);

    assert_eq!(
        tracker.check_lock(&thread("5"), viewer(2)).expect("check"),
        Some(viewer(1))
    );
    assert_eq!(
        tracker.check_lock(&thread("6"), viewer(1)).expect("check"),
        Some(viewer(2))
    );
}

#[test]
fn two_moderator_reply_scenario() {
    let base = 1_700_000_000;
    let (tracker, _store, clock) = memory_tracker(base, WINDOW);
    let (a, b) = (viewer(1), viewer(2));
    let topic = thread("5");

    // A opens the thread.
    assert!(matches!(tracker.handle_ping(&topic, a, true), PingOutcome::Claimed(_)));

    // +10s: B opens it, is warned, and its ping leaves A's claim alone.
    clock.set(base + 10);
    assert_eq!(tracker.check_lock(&topic, b).expect("check"), Some(a));
    assert_eq!(tracker.handle_ping(&topic, b, true), PingOutcome::HeldBy(a));

    // +130s: A replies after the claim went stale; release still fires.
    clock.set(base + 130);
    assert!(tracker
        .release_on_terminal_action(&topic, a, true)
        .expect("release"));

    // +131s: B pings and takes the claim.
    clock.set(base + 131);
    let outcome = tracker.handle_ping(&topic, b, true);
    assert!(matches!(outcome, PingOutcome::Claimed(ref claim) if claim.claimed_at == base + 131));
    assert_eq!(tracker.check_lock(&topic, a).expect("check"), Some(b));
}
