//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding API payloads.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a request body failed.
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A response body was not valid JSON or did not match the expected
    /// shape (missing fields, wrong types, a login status other than `0`
    /// or `1`).
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),
}
