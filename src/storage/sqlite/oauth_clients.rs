//! SQLite implementation for OAuth client storage

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tokio_util::sync::CancellationToken;

use crate::errors::{StorageError, TableInitError};
use crate::oauth::types::{Client, ClientInfo};
use crate::storage::codec::{ClientCodec, JsonCodec};
use crate::storage::options::{ClientStoreOptions, TableName};
use crate::storage::traits::{ClientStore, Result};

/// SQLite implementation of OAuth client storage
#[derive(Debug)]
pub struct SqliteClientStore<C = Client, K = JsonCodec> {
    pool: SqlitePool,
    table_name: TableName,
    codec: K,
    _client: PhantomData<fn() -> C>,
}

impl SqliteClientStore {
    /// Create a store on an existing pool, creating the table unless disabled.
    ///
    /// The pool is used as given; pool limits in `options` only take effect through
    /// [`SqliteClientStore::connect`] or [`crate::storage::PoolSettings::apply`].
    pub async fn new(
        pool: SqlitePool,
        options: ClientStoreOptions,
    ) -> std::result::Result<Self, TableInitError<Self>> {
        Self::with_codec(pool, options, JsonCodec).await
    }

    /// Open a pool configured from `options` and create a store on it
    pub async fn connect(database_url: &str, options: ClientStoreOptions) -> Result<Self> {
        Self::connect_with_codec(database_url, options, JsonCodec).await
    }
}

impl<C, K> SqliteClientStore<C, K>
where
    K: ClientCodec,
{
    pub async fn with_codec(
        pool: SqlitePool,
        options: ClientStoreOptions,
        codec: K,
    ) -> std::result::Result<Self, TableInitError<Self>> {
        let store = Self {
            pool,
            table_name: options.get_table_name().clone(),
            codec,
            _client: PhantomData,
        };

        if options.is_init_table_disabled() {
            return Ok(store);
        }

        match store.init_table().await {
            Ok(()) => Ok(store),
            Err(err) => {
                tracing::warn!(table = %store.table_name, error = %err, "client table initialization failed");
                Err(TableInitError::new(store, err))
            }
        }
    }

    pub async fn connect_with_codec(
        database_url: &str,
        options: ClientStoreOptions,
        codec: K,
    ) -> Result<Self> {
        let settings = options.pool_settings();
        let pool = settings
            .apply(SqlitePoolOptions::new())
            .connect(database_url)
            .await?;

        tracing::info!(
            max_open_conns = settings.effective_open_conns(),
            max_idle_conns = settings.effective_idle_conns(),
            max_lifetime = ?settings.max_lifetime,
            "SQLite client store pool connected"
        );

        Self::with_codec(pool, options, codec)
            .await
            .map_err(StorageError::from)
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn table_name(&self) -> &TableName {
        &self.table_name
    }

    async fn init_table(&self) -> Result<()> {
        sqlx::query(&create_table_sql(&self.table_name))
            .execute(&self.pool)
            .await?;

        tracing::debug!(table = %self.table_name, "client table ready");
        Ok(())
    }
}

fn create_table_sql(table_name: &TableName) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id VARCHAR(255) NOT NULL PRIMARY KEY,
            secret VARCHAR(255) NOT NULL,
            domain VARCHAR(255) NOT NULL,
            data TEXT NOT NULL
        )
        "#
    )
}

fn select_by_id_sql(table_name: &TableName) -> String {
    format!("SELECT id, secret, domain, data FROM {table_name} WHERE id = ?")
}

fn insert_sql(table_name: &TableName) -> String {
    format!("INSERT INTO {table_name} (id, secret, domain, data) VALUES (?, ?, ?, ?)")
}

fn delete_all_sql(table_name: &TableName) -> String {
    format!("DELETE FROM {table_name}")
}

fn delete_by_id_sql(table_name: &TableName) -> String {
    format!("DELETE FROM {table_name} WHERE id = ?")
}

#[async_trait]
impl<C, K> ClientStore for SqliteClientStore<C, K>
where
    C: ClientInfo + Serialize + DeserializeOwned + Send + Sync + 'static,
    K: ClientCodec + 'static,
{
    type Client = C;

    async fn get_by_id(&self, ctx: &CancellationToken, id: &str) -> Result<Option<C>> {
        if id.is_empty() {
            return Ok(None);
        }

        let sql = select_by_id_sql(&self.table_name);
        let query = sqlx::query(&sql).bind(id).fetch_optional(&self.pool);

        let row = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(StorageError::Cancelled),
            row = query => row?,
        };

        match row {
            Some(row) => {
                let data: String = row.try_get("data")?;
                self.codec.decode(&data).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn create(&self, info: &C) -> Result<()> {
        let data = self.codec.encode(info)?;

        sqlx::query(&insert_sql(&self.table_name))
            .bind(info.id())
            .bind(info.secret())
            .bind(info.domain())
            .bind(&data)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        let result = sqlx::query(&delete_all_sql(&self.table_name))
            .execute(&self.pool)
            .await?;

        tracing::debug!(table = %self.table_name, rows = result.rows_affected(), "deleted all clients");
        Ok(())
    }

    async fn delete_client_id(&self, info: &C) -> Result<()> {
        sqlx::query(&delete_by_id_sql(&self.table_name))
            .bind(info.id())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
