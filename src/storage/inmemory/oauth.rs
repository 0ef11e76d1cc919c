//! In-memory OAuth client storage implementation
//!
//! Clients are kept encoded, exactly as a SQL backend would hold them in its `data`
//! column, so codec failures surface the same way.

use std::collections::HashMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::errors::StorageError;
use crate::oauth::types::{Client, ClientInfo};
use crate::storage::codec::{ClientCodec, JsonCodec};
use crate::storage::traits::{ClientStore, Result};

/// A stored row: the indexed columns plus the encoded client
#[derive(Debug, Clone)]
struct StoredClient {
    secret: String,
    domain: String,
    data: String,
}

/// In-memory implementation of OAuth client storage
#[derive(Debug)]
pub struct MemoryClientStore<C = Client, K = JsonCodec> {
    clients: RwLock<HashMap<String, StoredClient>>,
    codec: K,
    _client: PhantomData<fn() -> C>,
}

impl MemoryClientStore {
    pub fn new() -> Self {
        Self::with_codec(JsonCodec)
    }
}

impl Default for MemoryClientStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, K> MemoryClientStore<C, K>
where
    K: ClientCodec,
{
    pub fn with_codec(codec: K) -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
            codec,
            _client: PhantomData,
        }
    }

    /// Number of stored clients
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }

    /// Secret and domain columns stored for `id`
    pub async fn columns(&self, id: &str) -> Option<(String, String)> {
        self.clients
            .read()
            .await
            .get(id)
            .map(|stored| (stored.secret.clone(), stored.domain.clone()))
    }
}

#[async_trait]
impl<C, K> ClientStore for MemoryClientStore<C, K>
where
    C: ClientInfo + Serialize + DeserializeOwned + Send + Sync + 'static,
    K: ClientCodec + 'static,
{
    type Client = C;

    async fn get_by_id(&self, ctx: &CancellationToken, id: &str) -> Result<Option<C>> {
        if id.is_empty() {
            return Ok(None);
        }
        if ctx.is_cancelled() {
            return Err(StorageError::Cancelled);
        }

        let data = match self.clients.read().await.get(id) {
            Some(stored) => stored.data.clone(),
            None => return Ok(None),
        };

        self.codec.decode(&data).map(Some)
    }

    async fn create(&self, info: &C) -> Result<()> {
        let data = self.codec.encode(info)?;

        let mut clients = self.clients.write().await;
        if clients.contains_key(info.id()) {
            return Err(StorageError::DuplicateClient(info.id().to_string()));
        }
        clients.insert(
            info.id().to_string(),
            StoredClient {
                secret: info.secret().to_string(),
                domain: info.domain().to_string(),
                data,
            },
        );
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.clients.write().await.clear();
        Ok(())
    }

    async fn delete_client_id(&self, info: &C) -> Result<()> {
        self.clients.write().await.remove(info.id());
        Ok(())
    }
}
