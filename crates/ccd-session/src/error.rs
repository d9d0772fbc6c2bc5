//! Error types for the session layer.

use ccd_protocol::ProtocolError;

/// Errors that can occur while persisting or restoring a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The cookie store could not be read or written.
    #[error("cookie store failed: {0}")]
    CookieStore(#[source] std::io::Error),

    /// The persisted cookie exists but does not match the expected schema.
    /// Callers treat this exactly like a missing cookie.
    #[error("malformed login cookie: {0}")]
    MalformedCookie(String),

    /// Encoding the cookie failed.
    #[error(transparent)]
    Codec(#[from] ProtocolError),
}
