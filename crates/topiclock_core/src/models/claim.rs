//! Claim record and identifiers.
//!
//! A claim is persisted in the host metadata store as `"<claimed_at>:<viewer_id>"`
//! under the key `"lock:<resource_id>"`. Parsing is fail-open: anything that
//! cannot be read back is treated as "no active claim" by the tracker.

use crate::{error::AppError, LOCK_KEY_PREFIX};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a watched resource (a forum thread).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Wrap a caller-provided identifier, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] when the identifier is empty.
    pub fn parse(id: &str) -> Result<Self, AppError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(AppError::BadRequest(
                "resource id must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Key under which this resource's claim is stored.
    pub fn storage_key(&self) -> String {
        format!("{}{}", LOCK_KEY_PREFIX, self.0)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a forum user. `0` is the anonymous/system viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewerId(u64);

impl ViewerId {
    /// The anonymous viewer; never holds a claim.
    pub const ANONYMOUS: ViewerId = ViewerId(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub const fn is_anonymous(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ViewerId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// The most recent "currently viewing" record for a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub resource_id: ResourceId,
    /// Seconds since the Unix epoch when the claim was written.
    pub claimed_at: u64,
    pub viewer_id: ViewerId,
}

impl Claim {
    pub fn new(resource_id: ResourceId, claimed_at: u64, viewer_id: ViewerId) -> Self {
        Self {
            resource_id,
            claimed_at,
            viewer_id,
        }
    }

    /// Encode into the stored `"<claimed_at>:<viewer_id>"` form.
    pub fn encode(&self) -> String {
        format!("{}:{}", self.claimed_at, self.viewer_id)
    }

    /// Decode a stored value.
    ///
    /// The timestamp segment must be an unsigned integer. A missing or
    /// non-numeric viewer segment reads as [`ViewerId::ANONYMOUS`].
    ///
    /// # Errors
    /// Returns [`AppError::MalformedClaim`] when the timestamp segment does not parse.
    pub fn decode(resource_id: ResourceId, raw: &str) -> Result<Self, AppError> {
        let mut parts = raw.split(':');
        let claimed_at = parts
            .next()
            .map(str::trim)
            .and_then(|time| time.parse::<u64>().ok())
            .ok_or_else(|| AppError::MalformedClaim(raw.to_string()))?;
        let viewer_id = parts
            .next()
            .and_then(|viewer| viewer.trim().parse::<u64>().ok())
            .map(ViewerId::new)
            .unwrap_or(ViewerId::ANONYMOUS);
        Ok(Self::new(resource_id, claimed_at, viewer_id))
    }

    /// Whether the claim is still inside the active window at `now`.
    ///
    /// A zero timestamp never counts as active. Timestamps ahead of `now`
    /// (clock skew between writers) count as freshly written.
    pub fn is_active(&self, now: u64, window_secs: u64) -> bool {
        self.claimed_at != 0 && now.saturating_sub(self.claimed_at) < window_secs
    }

    /// Claim timestamp as a UTC datetime, when representable.
    pub fn claimed_at_utc(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.claimed_at)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Inferred state of a resource's claim at a point in time.
///
/// Expiry is never stored; `Expired` is derived from the stored timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimState {
    Absent,
    Active(Claim),
    Expired(Claim),
    /// Stored value could not be decoded; behaves like `Absent` for lookups.
    Malformed(String),
}

impl ClaimState {
    /// Classify a raw stored value against `now` and the active window.
    pub fn from_stored(
        resource_id: &ResourceId,
        raw: Option<&str>,
        now: u64,
        window_secs: u64,
    ) -> Self {
        let Some(raw) = raw else {
            return Self::Absent;
        };
        match Claim::decode(resource_id.clone(), raw) {
            Ok(claim) if claim.is_active(now, window_secs) => Self::Active(claim),
            Ok(claim) => Self::Expired(claim),
            Err(_) => Self::Malformed(raw.to_string()),
        }
    }

    /// The active claim, if any.
    pub fn active(&self) -> Option<&Claim> {
        match self {
            Self::Active(claim) => Some(claim),
            _ => None,
        }
    }

    /// The stored claim regardless of expiry.
    pub fn stored(&self) -> Option<&Claim> {
        match self {
            Self::Active(claim) | Self::Expired(claim) => Some(claim),
            Self::Absent | Self::Malformed(_) => None,
        }
    }
}
