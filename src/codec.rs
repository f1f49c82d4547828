//! JSON body encoding.
//!
//! The serializer collaborator: request bodies are encoded with
//! `serde_json`, response bodies decoded into the expected shape. Unknown
//! response fields are ignored, so newer node versions that add fields
//! stay readable.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Serializes a request body to JSON bytes.
///
/// # Errors
///
/// Returns the `serde_json` error if `value` cannot be represented as JSON.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Deserializes a response body.
///
/// An empty (or whitespace-only) body decodes as JSON `null`, so `()` and
/// `Option<T>` targets accept bodiless responses.
///
/// # Errors
///
/// Returns the `serde_json` error if `bytes` do not match `T`.
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_slice(b"null");
    }
    serde_json::from_slice(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Shape {
        count: u32,
    }

    #[test]
    fn deserialize_ignores_unknown_fields() {
        let shape: Shape = deserialize(br#"{"count": 3, "added_in_next_version": true}"#).unwrap();

        assert_eq!(shape, Shape { count: 3 });
    }

    #[test]
    fn deserialize_empty_body_as_unit() {
        let missing: Option<Shape> = deserialize(b"  \n").unwrap();

        assert!(deserialize::<()>(b"").is_ok());
        assert_eq!(missing, None);
    }

    #[test]
    fn deserialize_empty_body_into_struct_fails() {
        let result: Result<Shape, _> = deserialize(b"");

        assert!(result.is_err());
    }

    #[test]
    fn serialize_writes_compact_json() {
        let bytes = serialize(&serde_json::json!({"network": "mainnet"})).unwrap();

        assert_eq!(bytes, br#"{"network":"mainnet"}"#);
    }
}
