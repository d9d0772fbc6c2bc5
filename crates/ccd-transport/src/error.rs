use std::time::Duration;

/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No response arrived before the deadline.
    #[error("request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The transport could not be constructed.
    #[error("transport setup failed: {0}")]
    Setup(String),
}

impl TransportError {
    /// Returns `true` for the deadline variant.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
