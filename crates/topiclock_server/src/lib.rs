//! HTTP server wiring for topic presence locks (API, handlers, and shared state).

/// HTTP error mapping for API handlers.
pub mod error;
/// HTTP handlers for heartbeat, lock query, and release endpoints.
pub mod handlers;
/// Viewer identity resolved from host headers.
pub mod viewer;

pub use error::HttpError;
pub use topiclock_core::{
    config, db, models, AppError, Claim, Clock, Config, Database, ManualClock, MemoryStore,
    MetaStore, PingOutcome, PresenceTracker, ResourceId, SystemClock, ViewerId, DEFAULT_PORT,
};
pub use viewer::{Viewer, VIEWER_CAPABILITIES_HEADER, VIEWER_ID_HEADER};

use axum::{
    extract::DefaultBodyLimit,
    http::header,
    routing::{get, post},
    Router,
};
use axum::http::HeaderValue;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tracker: PresenceTracker,
}

impl AppState {
    /// Construct shared application state over an open database.
    ///
    /// Claims are timestamped with the system clock and expire after
    /// `config.active_window_secs`.
    ///
    /// # Returns
    /// A new [`AppState`].
    pub fn new(config: Config, db: Arc<Database>) -> Self {
        let tracker = PresenceTracker::new(db, Arc::new(SystemClock), config.active_window_secs);
        Self::with_tracker(config, tracker)
    }

    /// Construct shared application state with a pre-configured tracker.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `tracker`: Tracker with its own store and clock.
    ///
    /// # Returns
    /// A new [`AppState`] wired to the provided tracker.
    pub fn with_tracker(config: Config, tracker: PresenceTracker) -> Self {
        Self {
            config: Arc::new(config),
            tracker,
        }
    }
}

/// Create the application router with all routes and middleware.
///
/// # Arguments
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
///
/// # Returns
/// Configured `axum::Router`.
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    let content_security_policy =
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'");

    // The forum host page calls in from its own origin when public access is on.
    let cors = if allow_public_access {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers(tower_http::cors::Any)
    } else {
        CorsLayer::new()
            .allow_origin(
                [
                    format!("http://localhost:{}", cors_port),
                    format!("http://127.0.0.1:{}", cors_port),
                ]
                .into_iter()
                .filter_map(|origin| HeaderValue::from_str(&origin).ok())
                .collect::<Vec<_>>(),
            )
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::HeaderName::from_static(VIEWER_ID_HEADER),
                header::HeaderName::from_static(VIEWER_CAPABILITIES_HEADER),
            ])
    };

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/heartbeat", post(handlers::heartbeat::heartbeat))
        .route("/api/resources/:id/lock", get(handlers::lock::get_lock))
        .route(
            "/api/resources/:id/terminal-action",
            post(handlers::lock::terminal_action),
        )
        .with_state(state.clone())
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(state.config.max_body_size))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    content_security_policy,
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Arguments
/// - `listener`: Bound TCP listener for the server.
/// - `state`: Shared application state.
/// - `allow_public_access`: Whether to allow cross-origin requests from any origin.
/// - `shutdown_signal`: Future that resolves when shutdown should start.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
