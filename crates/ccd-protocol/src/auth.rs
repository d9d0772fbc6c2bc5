//! Authentication payloads: login, login status.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /user/login?_format=json`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub pass: String,
}

impl LoginRequest {
    pub fn new(name: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pass: pass.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("name", &self.name)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// The user block inside a successful login response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Drupal sends the uid as a string; older endpoints send a number.
    /// Either way it is parsed base 10.
    #[serde(deserialize_with = "deserialize_uid")]
    pub uid: u64,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of a 200 response to a login request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub current_user: CurrentUser,
    pub csrf_token: String,
    pub logout_token: String,
}

/// Body of `GET /user/login_status?_format=json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    /// The server answered `1`.
    LoggedIn,
    /// The server answered `0`.
    LoggedOut,
}

impl LoginStatus {
    pub fn is_logged_in(self) -> bool {
        matches!(self, Self::LoggedIn)
    }
}

impl<'de> Deserialize<'de> for LoginStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        match NumberOrString::deserialize(d)?.as_u64() {
            Some(1) => Ok(Self::LoggedIn),
            Some(0) => Ok(Self::LoggedOut),
            _ => Err(serde::de::Error::custom(
                "login status must be 0 or 1",
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

impl NumberOrString {
    fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Accepts a uid written either as a JSON number or as a decimal string.
pub fn deserialize_uid<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let raw = NumberOrString::deserialize(d)?;
    raw.as_u64()
        .ok_or_else(|| serde::de::Error::custom("uid is not a base-10 integer"))
}
