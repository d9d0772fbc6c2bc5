//! The `ccd_login` cookie: a persisted mirror of the session.
//!
//! The cookie only exists so a session survives a restart. The session
//! context stays the source of truth; the cookie is written alongside it
//! and read back once per mount.

use ccd_protocol::{Codec, JsonCodec, deserialize_uid};
use serde::{Deserialize, Serialize};

use crate::{Session, SessionError};

/// Name of the persisted login cookie.
pub const COOKIE_NAME: &str = "ccd_login";

/// Name under which the server's authentication cookie for the API
/// origin is persisted, as a `Cookie` header value.
pub const SERVER_COOKIE_NAME: &str = "ccd_server";

/// The persisted shape of a session.
///
/// Field names follow the cookie format the booking site has always
/// written: `{"uid", "CsrfToken", "logoutToken", "roles"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCookie {
    #[serde(deserialize_with = "deserialize_uid")]
    pub uid: u64,
    #[serde(rename = "CsrfToken")]
    pub csrf_token: String,
    #[serde(rename = "logoutToken")]
    pub logout_token: String,
    pub roles: Vec<String>,
}

impl LoginCookie {
    /// Serializes the cookie value.
    pub fn encode(&self) -> Result<String, SessionError> {
        let bytes = JsonCodec.encode(self)?;
        String::from_utf8(bytes)
            .map_err(|e| SessionError::MalformedCookie(e.to_string()))
    }

    /// Parses and validates a cookie value.
    ///
    /// Every field must be present and the CSRF token must be non-empty;
    /// anything else is [`SessionError::MalformedCookie`].
    pub fn decode(raw: &str) -> Result<Self, SessionError> {
        let cookie: Self = JsonCodec
            .decode(raw.trim().as_bytes())
            .map_err(|e| SessionError::MalformedCookie(e.to_string()))?;
        if cookie.csrf_token.is_empty() {
            return Err(SessionError::MalformedCookie(
                "empty CSRF token".into(),
            ));
        }
        Ok(cookie)
    }

    pub fn into_session(self) -> Session {
        Session {
            uid: self.uid,
            csrf_token: self.csrf_token,
            logout_token: self.logout_token,
            roles: self.roles,
        }
    }
}

impl From<&Session> for LoginCookie {
    fn from(session: &Session) -> Self {
        Self {
            uid: session.uid,
            csrf_token: session.csrf_token.clone(),
            logout_token: session.logout_token.clone(),
            roles: session.roles.clone(),
        }
    }
}
