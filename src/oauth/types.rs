//! OAuth2 client types.
//!
//! Defines the client-info capability trait used by authorization servers and the
//! concrete client record persisted in the opaque `data` column.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Read access to a registered OAuth2 client's credentials.
///
/// The store only needs the id, secret and domain to fill the indexed columns; the
/// full value is persisted through a [`crate::storage::ClientCodec`].
pub trait ClientInfo {
    /// Unique client identifier
    fn id(&self) -> &str;

    /// Client secret
    fn secret(&self) -> &str;

    /// Redirect domain associated with the client
    fn domain(&self) -> &str;

    /// Whether the client is public (cannot keep its secret confidential)
    fn is_public(&self) -> bool {
        false
    }

    /// Owner of the client, empty when not bound to a user
    fn user_id(&self) -> &str {
        ""
    }
}

/// OAuth2 client record
///
/// Field names on the wire are `ID`, `Secret`, `Domain`, `Public` and `UserID`, which is
/// the layout existing `data` columns already hold. Any other fields are kept in
/// [`Client::extra`] so they survive a round trip through the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Secret")]
    pub secret: String,
    #[serde(rename = "Domain")]
    pub domain: String,
    #[serde(rename = "Public", default)]
    pub public: bool,
    #[serde(rename = "UserID", default)]
    pub user_id: String,
    /// Framework-specific fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Client {
    /// Create a confidential client with no owner and no extended fields
    pub fn new(
        id: impl Into<String>,
        secret: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
            domain: domain.into(),
            ..Default::default()
        }
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    /// Attach an extended field that is stored only in the opaque data blob
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

impl ClientInfo for Client {
    fn id(&self) -> &str {
        &self.id
    }

    fn secret(&self) -> &str {
        &self.secret
    }

    fn domain(&self) -> &str {
        &self.domain
    }

    fn is_public(&self) -> bool {
        self.public
    }

    fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_info_accessors() {
        let client = Client::new("abc", "s1", "example.com").with_user_id("user-1");
        assert_eq!(client.id(), "abc");
        assert_eq!(client.secret(), "s1");
        assert_eq!(client.domain(), "example.com");
        assert_eq!(client.user_id(), "user-1");
        assert!(!client.is_public());
    }

    #[test]
    fn test_client_wire_field_names() {
        let client = Client::new("abc", "s1", "example.com").with_public(true);
        let value = serde_json::to_value(&client).unwrap();
        assert_eq!(
            value,
            json!({
                "ID": "abc",
                "Secret": "s1",
                "Domain": "example.com",
                "Public": true,
                "UserID": "",
            })
        );
    }

    #[test]
    fn test_client_decodes_minimal_blob() {
        let client: Client =
            serde_json::from_str(r#"{"ID":"abc","Secret":"s1","Domain":"example.com"}"#).unwrap();
        assert_eq!(client, Client::new("abc", "s1", "example.com"));
    }

    #[test]
    fn test_client_extended_fields_round_trip() {
        let client = Client::new("abc", "s1", "example.com")
            .with_extra("scopes", json!(["read", "write"]))
            .with_extra("name", "Example App");

        let encoded = serde_json::to_string(&client).unwrap();
        let decoded: Client = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, client);
        assert_eq!(decoded.extra.get("name"), Some(&json!("Example App")));
    }
}
