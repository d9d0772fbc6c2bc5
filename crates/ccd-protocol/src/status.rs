//! Classification of HTTP outcomes.
//!
//! All branching in the client is driven by [`StatusClass`] rather than
//! by raw status codes, so the set of distinguished outcomes stays in one
//! place.

use std::fmt;

/// The response code reported to the UI when no response arrived at all.
pub const NETWORK_FAILURE_CODE: u16 = 500;

/// What kind of answer a request got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// 200
    Success,
    /// 204
    NoContent,
    /// 302
    Redirect,
    /// 400
    ClientError,
    /// 403. On login this means a stale session is in the way.
    Forbidden,
    /// 404
    NotFound,
    /// 500
    ServerError,
    /// Any other status code.
    Other(u16),
    /// No response: timeout or transport error.
    NetworkFailure,
}

impl StatusClass {
    /// Classifies a received status code.
    pub fn classify(status: u16) -> Self {
        match status {
            200 => Self::Success,
            204 => Self::NoContent,
            302 => Self::Redirect,
            400 => Self::ClientError,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            500 => Self::ServerError,
            other => Self::Other(other),
        }
    }

    /// The status code, or `None` for [`StatusClass::NetworkFailure`].
    pub fn status(self) -> Option<u16> {
        match self {
            Self::Success => Some(200),
            Self::NoContent => Some(204),
            Self::Redirect => Some(302),
            Self::ClientError => Some(400),
            Self::Forbidden => Some(403),
            Self::NotFound => Some(404),
            Self::ServerError => Some(500),
            Self::Other(code) => Some(code),
            Self::NetworkFailure => None,
        }
    }

    /// The code to show a user. Network failures report
    /// [`NETWORK_FAILURE_CODE`].
    pub fn response_code(self) -> u16 {
        self.status().unwrap_or(NETWORK_FAILURE_CODE)
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status() {
            Some(code) => write!(f, "HTTP {code}"),
            None => f.write_str("network failure"),
        }
    }
}
