//! Standardized error types following the `error-sqlstore-<domain>-<number>` format.

use std::fmt;

use thiserror::Error;

/// Configuration errors raised while reading the environment or building store options
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error when a duration string cannot be parsed
    #[error("error-sqlstore-config-1 Failed to parse duration '{0}': {1}")]
    DurationParsingFailed(String, String),

    /// Error when a connection count cannot be parsed
    #[error("error-sqlstore-config-2 Failed to parse connection count '{0}': {1}")]
    ConnectionCountParsingFailed(String, std::num::ParseIntError),

    /// Error when boolean string cannot be parsed
    #[error(
        "error-sqlstore-config-3 Failed to parse boolean '{0}': expected true/false/1/0/yes/no/on/off"
    )]
    BoolParsingFailed(String),

    /// Error when the table name is not a plain SQL identifier
    #[error("error-sqlstore-config-4 Invalid table name '{0}'")]
    InvalidTableName(String),

    /// Error when the storage backend name is not recognised or not compiled in
    #[error("error-sqlstore-config-5 Unknown storage backend: {0}")]
    UnknownBackend(String),

    /// Error when a backend needs a database URL and none was configured
    #[error("error-sqlstore-config-6 DATABASE_URL required for {0} backend")]
    DatabaseUrlRequired(String),

    /// Error when the open connection limit is zero
    #[error("error-sqlstore-config-7 Max open connections must be greater than zero")]
    ZeroMaxOpenConns,
}

/// Client store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Error reported by the database driver, passed through untouched
    #[error("error-sqlstore-storage-1 Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Error when the client record cannot be encoded into the data column
    #[error("error-sqlstore-storage-2 Data serialization failed: {0}")]
    SerializationFailed(String),

    /// Error when the data column cannot be decoded into a client record
    #[error("error-sqlstore-storage-3 Data deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Error when a client id is already present in a backend without SQL constraints
    #[error("error-sqlstore-storage-4 Client already exists: {0}")]
    DuplicateClient(String),

    /// Error when the caller cancelled a lookup before it completed
    #[error("error-sqlstore-storage-5 Operation cancelled")]
    Cancelled,

    /// Error when store options are rejected at construction
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StorageError {
    /// Returns true when the error was caused by inserting an id that already exists.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StorageError::Database(sqlx::Error::Database(err)) => err.is_unique_violation(),
            StorageError::DuplicateClient(_) => true,
            _ => false,
        }
    }
}

/// Table creation failed while constructing a store.
///
/// The store itself was still built and can be recovered with [`TableInitError::into_store`];
/// whether to keep using it is up to the caller.
pub struct TableInitError<S> {
    store: S,
    source: StorageError,
}

impl<S> TableInitError<S> {
    pub(crate) fn new(store: S, source: StorageError) -> Self {
        Self { store, source }
    }

    /// The error returned by the `CREATE TABLE` statement.
    pub fn error(&self) -> &StorageError {
        &self.source
    }

    /// Recover the constructed store, discarding the error.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Discard the store and keep the error.
    pub fn into_source(self) -> StorageError {
        self.source
    }

    /// Split into the constructed store and the error.
    pub fn into_parts(self) -> (S, StorageError) {
        (self.store, self.source)
    }
}

impl<S> fmt::Debug for TableInitError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableInitError")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl<S> fmt::Display for TableInitError<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error-sqlstore-storage-6 Table initialization failed: {}", self.source)
    }
}

impl<S> From<TableInitError<S>> for StorageError {
    fn from(err: TableInitError<S>) -> Self {
        err.into_source()
    }
}

impl<S> std::error::Error for TableInitError<S> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
