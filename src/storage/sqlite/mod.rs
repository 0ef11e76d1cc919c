//! SQLite storage implementation
//!
//! Suitable for single-node deployments and tests; use `sqlite::memory:` with a
//! single-connection pool for an ephemeral database.

mod oauth_clients;

pub use oauth_clients::SqliteClientStore;
