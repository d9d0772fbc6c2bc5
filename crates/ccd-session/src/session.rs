//! Session types: who is logged in and what they must present.
//!
//! A [`Session`] is the client's record of a successful login. It tracks:
//! - WHO the user is (`uid`)
//! - WHAT they may do (`roles`)
//! - HOW to prove the requests are theirs (`csrf_token`)
//! - HOW to end the session (`logout_token`)

use std::fmt;

use ccd_protocol::{LoginRequest, LoginResponse};

// ---------------------------------------------------------------------------
// LoginCredentials
// ---------------------------------------------------------------------------

/// A username and password as typed into the login form.
///
/// Transient: never persisted and never logged. `Debug` hides the password.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The body the login endpoint expects (`{name, pass}`).
    pub fn to_request(&self) -> LoginRequest {
        LoginRequest::new(&self.username, &self.password)
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// An authenticated session.
///
/// Created from a 200 login response, or restored from the login cookie.
/// Roles keep the order the server sent them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uid: u64,
    pub csrf_token: String,
    pub logout_token: String,
    pub roles: Vec<String>,
}

impl Session {
    /// Returns `true` if the user holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl From<LoginResponse> for Session {
    fn from(res: LoginResponse) -> Self {
        Self {
            uid: res.current_user.uid,
            csrf_token: res.csrf_token,
            logout_token: res.logout_token,
            roles: res.current_user.roles,
        }
    }
}
