//! OAuth2 client-info capability set consumed by the client stores.

pub mod types;

pub use types::{Client, ClientInfo};
