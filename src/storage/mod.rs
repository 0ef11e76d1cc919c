//! Client record storage with in-memory, SQLite, and PostgreSQL backends.

pub mod codec;
pub mod inmemory;
pub mod options;
pub mod traits;

// Feature-gated storage implementations
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

// Re-export commonly used types and traits
pub use codec::{ClientCodec, JsonCodec};
pub use inmemory::MemoryClientStore;
pub use options::{ClientStoreOptions, PoolSettings, TableName};
pub use traits::*;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteClientStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresClientStore;

use crate::config::Config;
use crate::errors::{ConfigError, StorageError};
use crate::oauth::types::Client;
use std::sync::Arc;

/// Shared handle to a client store holding [`Client`] records
pub type DynClientStore = Arc<dyn ClientStore<Client = Client>>;

/// Storage backend configuration and factory
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    #[cfg(feature = "sqlite")]
    Sqlite(String), // Connection string/path
    #[cfg(feature = "postgres")]
    Postgres(String), // Connection string
}

/// Create a client store based on configuration.
///
/// Unlike the backend constructors, a failed table creation is fatal here.
pub async fn create_client_store(
    backend: StorageBackend,
    options: ClientStoreOptions,
) -> std::result::Result<DynClientStore, StorageError> {
    match backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryClientStore::new())),
        #[cfg(feature = "sqlite")]
        StorageBackend::Sqlite(database_url) => {
            let store = SqliteClientStore::connect(&database_url, options).await?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres(database_url) => {
            let store = PostgresClientStore::connect(&database_url, options).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Create a client store from environment configuration
pub async fn create_client_store_from_config(
    config: &Config,
) -> std::result::Result<DynClientStore, StorageError> {
    let backend = parse_storage_backend(&config.storage_backend, config.database_url.as_deref())?;
    create_client_store(backend, config.store_options()).await
}

/// Parse storage backend from configuration string
pub fn parse_storage_backend(
    backend_name: &str,
    database_url: Option<&str>,
) -> std::result::Result<StorageBackend, ConfigError> {
    match backend_name {
        "memory" => Ok(StorageBackend::Memory),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let url = database_url.unwrap_or("sqlite:oauth2_clients.db?mode=rwc");
            Ok(StorageBackend::Sqlite(url.to_string()))
        }
        #[cfg(feature = "postgres")]
        "postgres" => {
            let url = database_url
                .ok_or_else(|| ConfigError::DatabaseUrlRequired(backend_name.to_string()))?;
            Ok(StorageBackend::Postgres(url.to_string()))
        }
        _ => Err(ConfigError::UnknownBackend(backend_name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_parse_storage_backend() {
        assert_eq!(
            parse_storage_backend("memory", None).unwrap(),
            StorageBackend::Memory
        );
        assert!(matches!(
            parse_storage_backend("redis", None),
            Err(ConfigError::UnknownBackend(_))
        ));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_parse_sqlite_backend() {
        assert_eq!(
            parse_storage_backend("sqlite", Some("sqlite::memory:")).unwrap(),
            StorageBackend::Sqlite("sqlite::memory:".to_string())
        );
        assert!(matches!(
            parse_storage_backend("sqlite", None).unwrap(),
            StorageBackend::Sqlite(_)
        ));
    }

    #[cfg(feature = "postgres")]
    #[test]
    fn test_parse_postgres_requires_url() {
        assert!(matches!(
            parse_storage_backend("postgres", None),
            Err(ConfigError::DatabaseUrlRequired(_))
        ));
        assert_eq!(
            parse_storage_backend("postgres", Some("postgres://localhost/auth")).unwrap(),
            StorageBackend::Postgres("postgres://localhost/auth".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_memory_store() {
        let store = create_client_store(StorageBackend::Memory, ClientStoreOptions::new())
            .await
            .unwrap();
        let client = Client::new("abc", "s1", "example.com");
        store.create(&client).await.unwrap();

        let found = store
            .get_by_id(&CancellationToken::new(), "abc")
            .await
            .unwrap();
        assert_eq!(found, Some(client));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_create_sqlite_store() {
        let options = ClientStoreOptions::new().max_open_conns(1);
        let store = create_client_store(
            StorageBackend::Sqlite("sqlite::memory:".to_string()),
            options,
        )
        .await
        .unwrap();

        store.delete().await.unwrap();
        store
            .create(&Client::new("abc", "s1", "example.com"))
            .await
            .unwrap();
        let found = store
            .get_by_id(&CancellationToken::new(), "abc")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.secret, "s1");
    }
}
