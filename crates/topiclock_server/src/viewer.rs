//! Viewer identity supplied by the forum host.
//!
//! Authentication happens upstream; the host forwards the resolved user id and
//! capability list in request headers.

use axum::http::HeaderMap;
use topiclock_core::{ViewerId, MODERATE_CAPABILITY};

/// Header carrying the authenticated user id.
pub const VIEWER_ID_HEADER: &str = "x-viewer-id";
/// Header carrying a comma-separated capability list.
pub const VIEWER_CAPABILITIES_HEADER: &str = "x-viewer-capabilities";

/// Authenticated viewer of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub id: ViewerId,
    pub privileged: bool,
}

impl Viewer {
    /// Resolve the viewer from host-provided headers.
    ///
    /// A missing or unparsable id resolves to the anonymous viewer; a viewer
    /// is privileged when its capabilities include `moderate`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(VIEWER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(ViewerId::new)
            .unwrap_or(ViewerId::ANONYMOUS);
        let privileged = headers
            .get(VIEWER_CAPABILITIES_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|caps| {
                caps.split(',')
                    .any(|cap| cap.trim().eq_ignore_ascii_case(MODERATE_CAPABILITY))
            })
            .unwrap_or(false);
        Self { id, privileged }
    }
}
