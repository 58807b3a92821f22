//! Environment mutation helpers for config tests.

use std::sync::{Mutex, OnceLock};

/// Return the process-wide lock that serializes environment mutation.
///
/// Config tests read and write real environment variables; hold this lock
/// for the lifetime of every [`EnvGuard`].
pub fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

#[allow(unused_unsafe)]
fn write_var(key: &str, value: Option<&str>) {
    // SAFETY: callers hold `env_lock()` while test threads may run in parallel.
    unsafe {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
}

/// Overrides one environment variable and restores it on drop.
pub struct EnvGuard {
    key: String,
    previous: Option<String>,
}

impl EnvGuard {
    /// Set `key=value` until the guard is dropped.
    pub fn set(key: &str, value: &str) -> Self {
        Self::replace(key, Some(value))
    }

    /// Unset `key` until the guard is dropped.
    pub fn remove(key: &str) -> Self {
        Self::replace(key, None)
    }

    fn replace(key: &str, value: Option<&str>) -> Self {
        let previous = std::env::var(key).ok();
        write_var(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        write_var(self.key.as_str(), self.previous.as_deref());
    }
}
