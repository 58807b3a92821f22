//! Configuration loading from environment variables.

use crate::constants::{DEFAULT_ACTIVE_WINDOW_SECS, DEFAULT_MAX_BODY_SIZE, DEFAULT_PORT};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Runtime configuration for the topic lock service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    /// Seconds a claim stays active after its last write.
    pub active_window_secs: u64,
    pub max_body_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            port: DEFAULT_PORT,
            active_window_secs: DEFAULT_ACTIVE_WINDOW_SECS,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    // Windows
    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("topiclock")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

/// Parse the active window, rejecting zero and garbage.
fn parse_window_secs(value: &str) -> Option<u64> {
    match value.trim().parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(secs) => Some(secs),
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or invalid.
    pub fn from_env() -> Self {
        let window_raw = env::var("TOPIC_LOCK_WINDOW_SECS").ok();
        let active_window_secs = match window_raw.as_deref() {
            None => DEFAULT_ACTIVE_WINDOW_SECS,
            Some(raw) => parse_window_secs(raw).unwrap_or_else(|| {
                tracing::warn!(
                    "Invalid TOPIC_LOCK_WINDOW_SECS='{}'; using {}",
                    raw,
                    DEFAULT_ACTIVE_WINDOW_SECS
                );
                DEFAULT_ACTIVE_WINDOW_SECS
            }),
        };

        Self {
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(|_| default_db_path()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            active_window_secs,
            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_SIZE),
        }
    }
}
