//! Unified error type for the booking client.

use std::fmt;

use ccd_protocol::{NETWORK_FAILURE_CODE, ProtocolError};
use ccd_session::SessionError;
use ccd_transport::TransportError;

/// Shown when the login endpoint rejects the credentials.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Unrecognized e-mail or password.";
/// Shown for every other login failure.
pub const UNKNOWN_ERROR_MESSAGE: &str =
    "An unknown error has occurred. Please try again later.";

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each wrapped variant lets `?` convert
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// No response: timeout or transport failure.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A body could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The login cookie could not be persisted or restored.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The login flow failed.
    #[error(transparent)]
    Login(#[from] LoginError),

    /// The server answered with a status the operation cannot use.
    #[error("unexpected response status {0}")]
    Status(u16),

    /// The client configuration is incomplete or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Why a login attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginErrorKind {
    /// The login endpoint answered 400.
    InvalidCredentials,
    /// A stale session blocked the login and logout + retry did not clear
    /// it: the retry answered 403, or the logout did not complete with
    /// 200/302.
    SessionConflict,
    /// Anything else. `status` is `None` when no response arrived.
    Unknown { status: Option<u16> },
}

impl LoginErrorKind {
    /// The message shown next to the login form.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE,
            Self::SessionConflict | Self::Unknown { .. } => UNKNOWN_ERROR_MESSAGE,
        }
    }

    /// The response code to report alongside the message. Network
    /// failures report a synthetic 500.
    pub fn response_code(self) -> u16 {
        match self {
            Self::InvalidCredentials => 400,
            Self::SessionConflict => 403,
            Self::Unknown { status } => status.unwrap_or(NETWORK_FAILURE_CODE),
        }
    }
}

impl fmt::Display for LoginErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => f.write_str("invalid credentials"),
            Self::SessionConflict => f.write_str("session conflict"),
            Self::Unknown { status: Some(code) } => write!(f, "unknown error (HTTP {code})"),
            Self::Unknown { status: None } => f.write_str("unknown error (no response)"),
        }
    }
}

/// A failed login, with the underlying cause when there is one.
#[derive(Debug, thiserror::Error)]
#[error("login failed: {kind}")]
pub struct LoginError {
    kind: LoginErrorKind,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl LoginError {
    pub fn new(kind: LoginErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: LoginErrorKind,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            kind,
            source: Some(source.into()),
        }
    }

    pub fn kind(&self) -> LoginErrorKind {
        self.kind
    }

    /// Shorthand for `self.kind().user_message()`.
    pub fn user_message(&self) -> &'static str {
        self.kind.user_message()
    }
}

#[cfg(test)]
mod tests {
    use ccd_protocol::{Codec, JsonCodec, LoginStatus};

    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err: BookingError = TransportError::InvalidUrl("nope".into()).into();
        assert!(matches!(err, BookingError::Transport(_)));
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_from_protocol_error() {
        let decoded: Result<LoginStatus, _> = JsonCodec.decode(b"2");
        let err: BookingError = decoded.unwrap_err().into();
        assert!(matches!(err, BookingError::Protocol(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_from_session_error() {
        let err: BookingError = SessionError::MalformedCookie("x".into()).into();
        assert!(matches!(err, BookingError::Session(_)));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            LoginErrorKind::InvalidCredentials.user_message(),
            "Unrecognized e-mail or password."
        );
        assert_eq!(
            LoginErrorKind::SessionConflict.user_message(),
            "An unknown error has occurred. Please try again later."
        );
        assert_eq!(
            LoginErrorKind::Unknown { status: Some(502) }.user_message(),
            UNKNOWN_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_network_failure_reports_500() {
        assert_eq!(LoginErrorKind::Unknown { status: None }.response_code(), 500);
        assert_eq!(LoginErrorKind::Unknown { status: Some(418) }.response_code(), 418);
    }

    #[test]
    fn test_login_error_keeps_source() {
        use std::error::Error;
        let err = LoginError::with_source(
            LoginErrorKind::Unknown { status: None },
            TransportError::Timeout(std::time::Duration::from_millis(4000)),
        );
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "login failed: unknown error (no response)");
    }
}
