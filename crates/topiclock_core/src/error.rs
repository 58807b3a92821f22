//! Application error types for core storage and domain logic.
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("No authenticated viewer for claim")]
    NoViewer,

    #[error("Malformed claim value: {0:?}")]
    MalformedClaim(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Whether this error came from the backing key-value store.
    ///
    /// Store failures degrade the presence feature but never the host.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Database(_) | Self::StoreUnavailable(_))
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}
