//! OAuth2 client record storage.
//!
//! Persists registered OAuth2 clients (id, secret, domain and an opaque encoded copy of
//! the full record) in a single SQL table, behind the [`storage::ClientStore`] trait an
//! authorization server plugs into.

pub mod config;
pub mod errors;
pub mod oauth;
pub mod storage;
