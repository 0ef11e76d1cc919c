//! PostgreSQL storage implementation
//!
//! PostgreSQL is suitable for production deployments where several server
//! instances share one client registry.

mod oauth_clients;

pub use oauth_clients::PostgresClientStore;
