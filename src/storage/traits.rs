//! Storage trait definition for OAuth2 client records.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::StorageError;
use crate::oauth::types::ClientInfo;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Trait for storing and retrieving OAuth2 clients
///
/// Records are inserted once, read by id, and removed individually or all at once.
/// There is no update; replacing a client means deleting it and creating it again.
#[async_trait]
pub trait ClientStore: Send + Sync {
    type Client: ClientInfo + Send + Sync;

    /// Retrieve a client by ID
    ///
    /// Returns `Ok(None)` both when `id` is empty and when no client has that id;
    /// callers cannot tell the two apart. Cancelling `ctx` aborts the lookup with
    /// [`StorageError::Cancelled`].
    async fn get_by_id(&self, ctx: &CancellationToken, id: &str) -> Result<Option<Self::Client>>;

    /// Store a new client
    ///
    /// Duplicate ids are rejected by the backend's uniqueness constraint; see
    /// [`StorageError::is_unique_violation`].
    async fn create(&self, info: &Self::Client) -> Result<()>;

    /// Delete every client
    async fn delete(&self) -> Result<()>;

    /// Delete the client with the same id as `info`. Missing ids are not an error.
    async fn delete_client_id(&self, info: &Self::Client) -> Result<()>;
}
