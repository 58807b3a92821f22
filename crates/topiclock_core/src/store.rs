//! Key-value store seam for claim persistence.
//!
//! The tracker reads and writes exactly one key per operation; any store that
//! offers single-key get/set/delete is sufficient. No transactions are
//! assumed and concurrent writers resolve as last-write-wins.

use crate::error::AppError;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Host metadata store used to persist claims.
pub trait MetaStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Remove `key`.
    ///
    /// # Returns
    /// `true` when a value was present.
    fn delete(&self, key: &str) -> Result<bool, AppError>;
}

/// In-process store backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    fn entries(&self) -> Result<MutexGuard<'_, HashMap<String, String>>, AppError> {
        self.inner
            .lock()
            .map_err(|_| AppError::StoreUnavailable("memory store is poisoned".to_string()))
    }

    /// Number of stored keys.
    ///
    /// # Errors
    /// Returns [`AppError::StoreUnavailable`] when the store is poisoned.
    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.entries()?.len())
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    /// Returns [`AppError::StoreUnavailable`] when the store is poisoned.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.entries()?.is_empty())
    }
}

impl MetaStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.entries()?.remove(key).is_some())
    }
}
