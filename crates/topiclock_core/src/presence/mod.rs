//! Presence lock tracker.
//!
//! Records which privileged viewer is currently looking at a resource and
//! answers "is somebody else here?" for the presentation layer.
//!
//! # Model
//!
//! - One claim per resource, stored as a single key in the injected
//!   [`MetaStore`].
//! - A claim is active while `now - claimed_at < window`. Expiry is lazy and
//!   evaluated on every read; nothing sweeps stale claims.
//! - The first claimer keeps the claim until it expires or is released by a
//!   terminal action from the same viewer.
//!
//! The tracker is advisory: it keeps no in-memory state, takes no locks of
//! its own, and concurrent writers resolve as last-write-wins.

use crate::{
    clock::Clock,
    error::AppError,
    models::claim::{Claim, ClaimState, ResourceId, ViewerId},
    store::MetaStore,
};
use std::sync::Arc;

#[cfg(test)]
mod tests;

/// What a heartbeat ping did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingOutcome {
    /// Viewer is not privileged or anonymous; nothing was read or written.
    Ignored,
    /// A claim was written (new, reclaimed after expiry, or refreshed by its owner).
    Claimed(Claim),
    /// Another viewer holds an active claim; it was left untouched.
    HeldBy(ViewerId),
    /// The store failed; the presence feature is degraded for this ping.
    Degraded,
}

/// Tracks per-resource claims over an injected store and clock.
#[derive(Clone)]
pub struct PresenceTracker {
    store: Arc<dyn MetaStore>,
    clock: Arc<dyn Clock>,
    window_secs: u64,
}

impl PresenceTracker {
    /// Build a tracker.
    ///
    /// # Arguments
    /// - `store`: Host metadata store holding the claims.
    /// - `clock`: Time source for claim timestamps and expiry.
    /// - `window_secs`: Seconds a claim stays active after it is written.
    pub fn new(store: Arc<dyn MetaStore>, clock: Arc<dyn Clock>, window_secs: u64) -> Self {
        Self {
            store,
            clock,
            window_secs,
        }
    }

    /// Active window in seconds.
    pub fn window_secs(&self) -> u64 {
        self.window_secs
    }

    /// Process a heartbeat ping from `viewer` for `resource_id`.
    ///
    /// Non-privileged viewers never create claims. For privileged viewers a
    /// claim is written only when no *other* viewer holds an active one, so
    /// concurrent moderators do not steal the claim from each other on every
    /// ping interval.
    ///
    /// Never fails; store errors are logged and reported as
    /// [`PingOutcome::Degraded`].
    pub fn handle_ping(
        &self,
        resource_id: &ResourceId,
        viewer: ViewerId,
        is_privileged: bool,
    ) -> PingOutcome {
        if !is_privileged || viewer.is_anonymous() {
            return PingOutcome::Ignored;
        }

        match self.check_lock(resource_id, viewer) {
            Ok(Some(holder)) => {
                tracing::debug!(
                    "Resource {} held by viewer {}; ping from {} ignored",
                    resource_id,
                    holder,
                    viewer
                );
                return PingOutcome::HeldBy(holder);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("Presence check failed for resource {}: {}", resource_id, err);
                return PingOutcome::Degraded;
            }
        }

        match self.set_lock(resource_id, viewer) {
            Ok(claim) => PingOutcome::Claimed(claim),
            Err(AppError::NoViewer) => PingOutcome::Ignored,
            Err(err) => {
                tracing::warn!("Failed to write claim for resource {}: {}", resource_id, err);
                PingOutcome::Degraded
            }
        }
    }

    /// Write a claim for `viewer`, overwriting whatever is stored.
    ///
    /// # Returns
    /// The claim that was written.
    ///
    /// # Errors
    /// Returns [`AppError::NoViewer`] for the anonymous viewer (store
    /// untouched), or a store error when the write fails.
    pub fn set_lock(&self, resource_id: &ResourceId, viewer: ViewerId) -> Result<Claim, AppError> {
        if viewer.is_anonymous() {
            return Err(AppError::NoViewer);
        }
        let claim = Claim::new(resource_id.clone(), self.clock.now_secs(), viewer);
        self.store.set(&resource_id.storage_key(), &claim.encode())?;
        tracing::debug!(
            "Viewer {} claimed resource {} at {:?}",
            viewer,
            resource_id,
            claim.claimed_at_utc()
        );
        Ok(claim)
    }

    /// Return the viewer holding an active claim on `resource_id`, unless it
    /// is `requester` itself.
    ///
    /// Missing, malformed, zero-timestamp, and expired claims all read as
    /// `None`, as do claims whose owner decodes to the anonymous viewer.
    ///
    /// # Errors
    /// Returns a store error when the read fails.
    pub fn check_lock(
        &self,
        resource_id: &ResourceId,
        requester: ViewerId,
    ) -> Result<Option<ViewerId>, AppError> {
        let state = self.claim_state(resource_id)?;
        Ok(state
            .active()
            .map(|claim| claim.viewer_id)
            .filter(|holder| !holder.is_anonymous() && *holder != requester))
    }

    /// Presentation hook run before rendering a resource.
    ///
    /// # Errors
    /// Returns a store error when the read fails.
    pub fn query_lock(
        &self,
        resource_id: &ResourceId,
        viewer: ViewerId,
    ) -> Result<Option<ViewerId>, AppError> {
        self.check_lock(resource_id, viewer)
    }

    /// Release the claim on `resource_id` after `actor` completed a terminal
    /// action (e.g. published a reply).
    ///
    /// The stored owner is compared directly, ignoring both self-exclusion and
    /// the active window, so an expired claim that still belongs to `actor` is
    /// cleared as well.
    ///
    /// # Returns
    /// `true` when a claim was deleted.
    ///
    /// # Errors
    /// Returns a store error when the read or delete fails.
    pub fn release_on_terminal_action(
        &self,
        resource_id: &ResourceId,
        actor: ViewerId,
        is_privileged_actor: bool,
    ) -> Result<bool, AppError> {
        if !is_privileged_actor || actor.is_anonymous() {
            return Ok(false);
        }

        let state = self.claim_state(resource_id)?;
        let owned_by_actor = state
            .stored()
            .map(|claim| claim.viewer_id == actor)
            .unwrap_or(false);
        if !owned_by_actor {
            return Ok(false);
        }

        let removed = self.store.delete(&resource_id.storage_key())?;
        if removed {
            tracing::info!(
                "Released claim on resource {} after terminal action by {}",
                resource_id,
                actor
            );
        }
        Ok(removed)
    }

    /// Inspect the inferred claim state of `resource_id` without changing it.
    ///
    /// # Errors
    /// Returns a store error when the read fails.
    pub fn claim_state(&self, resource_id: &ResourceId) -> Result<ClaimState, AppError> {
        let raw = self.store.get(&resource_id.storage_key())?;
        let state = ClaimState::from_stored(
            resource_id,
            raw.as_deref(),
            self.clock.now_secs(),
            self.window_secs,
        );
        if let ClaimState::Malformed(ref value) = state {
            tracing::debug!(
                "Ignoring malformed claim {:?} on resource {}",
                value,
                resource_id
            );
        }
        Ok(state)
    }
}
