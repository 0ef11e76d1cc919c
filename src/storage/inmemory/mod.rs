//! In-memory storage implementation
//!
//! Suitable for development and testing. Contents are lost when the process exits.

mod oauth;

pub use oauth::MemoryClientStore;
