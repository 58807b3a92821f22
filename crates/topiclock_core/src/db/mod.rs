//! redb-backed metadata store for claims.

/// Table definitions.
pub mod tables;

use crate::{error::AppError, store::MetaStore};
use redb::{ReadableDatabase, ReadableTableMetadata};
use std::path::Path;
use std::sync::Arc;
use tables::{REDB_FILE_NAME, RESOURCE_META};


/// Database handle over the resource metadata table.
pub struct Database {
    pub db: Arc<redb::Database>,
}

impl Database {
    /// Open (or create) the database directory at `path`.
    ///
    /// The redb file lives at `<path>/data.redb`.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns [`AppError::StoreUnavailable`] when `path` is not a directory or
    /// the file is held by another process, and a database error when table
    /// initialization fails.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let root = Path::new(path);
        if root.exists() && !root.is_dir() {
            return Err(AppError::StoreUnavailable(format!(
                "DB_PATH '{}' exists but is not a directory",
                path
            )));
        }
        std::fs::create_dir_all(root).map_err(|err| {
            AppError::StoreUnavailable(format!(
                "Failed to create database directory '{}': {}",
                path, err
            ))
        })?;

        let file = root.join(REDB_FILE_NAME);
        let db = match redb::Database::create(&file) {
            Ok(db) => db,
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StoreUnavailable(format!(
                    "Database '{}' is already open in another process.\n\
                    Stop the other topiclock instance or set DB_PATH to a different location.",
                    file.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };
        tracing::debug!("Opened claim store at {}", file.display());
        Self::from_shared(Arc::new(db))
    }

    /// Build a handle from an already open redb database.
    ///
    /// # Errors
    /// Returns an error if the metadata table cannot be created.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(RESOURCE_META)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Clone this handle for another subsystem in the same process.
    ///
    /// # Errors
    /// Returns an error if table initialization fails.
    pub fn share(&self) -> Result<Self, AppError> {
        Self::from_shared(self.db.clone())
    }

    /// Flush pending writes.
    ///
    /// redb commits are durable once `commit` returns, so this only exists
    /// to give shutdown paths a single call site.
    pub fn flush(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Count stored metadata rows.
    ///
    /// # Errors
    /// Returns an error when the read transaction fails.
    pub fn len(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESOURCE_META)?;
        Ok(table.len()?)
    }

    /// Whether no metadata rows are stored.
    ///
    /// # Errors
    /// Returns an error when the read transaction fails.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}

impl MetaStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESOURCE_META)?;
        let value = table.get(key)?.map(|guard| guard.value().to_string());
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(RESOURCE_META)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(RESOURCE_META)?;
            let removed = table.remove(key)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }
}
