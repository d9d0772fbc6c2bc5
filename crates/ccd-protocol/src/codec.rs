//! Codec trait and the JSON implementation.
//!
//! Every body the booking API sends or accepts is JSON, but the layers
//! above only depend on [`Codec`], so tests can swap in a codec that
//! fails on purpose.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts between Rust values and request/response bodies.
///
/// `DeserializeOwned` (rather than `Deserialize<'de>`) lets callers drop
/// the response buffer as soon as decoding returns.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a request body.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if the value cannot be
    /// represented in this format.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes a response body.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the bytes are malformed or
    /// don't match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use ccd_protocol::{Codec, JsonCodec, LoginRequest};
///
/// let codec = JsonCodec;
/// let body = codec.encode(&LoginRequest::new("alice", "secret")).unwrap();
/// assert_eq!(body, br#"{"name":"alice","pass":"secret"}"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_body() {
        let body = JsonCodec
            .encode(&serde_json::json!({}))
            .expect("should encode");
        assert_eq!(body, b"{}");
    }

    #[test]
    fn test_decode_error_is_reported_as_decode() {
        let result: Result<Vec<String>, _> = JsonCodec.decode(b"{not json");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
