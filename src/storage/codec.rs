//! Codecs for the opaque `data` column.

use serde::{Serialize, de::DeserializeOwned};

use crate::errors::StorageError;
use crate::storage::traits::Result;

/// Converts a full client record to and from the text stored in the `data` column.
pub trait ClientCodec: Send + Sync {
    fn encode<C: Serialize>(&self, client: &C) -> Result<String>;

    fn decode<C: DeserializeOwned>(&self, data: &str) -> Result<C>;
}

/// JSON codec backed by `serde_json`
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ClientCodec for JsonCodec {
    fn encode<C: Serialize>(&self, client: &C) -> Result<String> {
        serde_json::to_string(client).map_err(|e| StorageError::SerializationFailed(e.to_string()))
    }

    fn decode<C: DeserializeOwned>(&self, data: &str) -> Result<C> {
        serde_json::from_str(data).map_err(|e| StorageError::DeserializationFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::Client;
    use serde::ser::Error as _;

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("not representable"))
        }
    }

    #[test]
    fn test_json_codec_round_trip() {
        let client = Client::new("abc", "s1", "example.com").with_extra("grant", "code");
        let data = JsonCodec.encode(&client).unwrap();
        let decoded: Client = JsonCodec.decode(&data).unwrap();
        assert_eq!(decoded, client);
    }

    #[test]
    fn test_json_codec_decode_failure() {
        let result: Result<Client> = JsonCodec.decode("{not json");
        assert!(matches!(result, Err(StorageError::DeserializationFailed(_))));
    }

    #[test]
    fn test_json_codec_encode_failure() {
        let result = JsonCodec.encode(&Unserializable);
        assert!(matches!(result, Err(StorageError::SerializationFailed(_))));
    }
}
