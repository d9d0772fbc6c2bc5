//! Client configuration parsed from environment variables.

use std::time::Duration;

use ccd_protocol::endpoints;
use ccd_transport::DEFAULT_TIMEOUT;

use crate::BookingError;

pub const DEFAULT_PROTOCOL: &str = "https";

/// Where the API lives and how the client identifies itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin every endpoint path is joined to, e.g. `https://www.contradance.org`.
    pub api_url: String,
    /// Origin of the booking app, sent as the `Origin` identity header.
    pub app_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Creates a config. Trailing slashes on either origin are dropped.
    pub fn new(api_url: impl Into<String>, app_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            app_url: app_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Build config from environment variables.
    ///
    /// Required:
    /// - `CCD_API_HOST`
    ///
    /// Optional:
    /// - `CCD_API_PROTOCOL`: default `https`
    /// - `CCD_APP_HOST`: defaults to `CCD_API_HOST`
    /// - `CCD_APP_PROTOCOL`: default `https`
    pub fn from_env() -> Result<Self, BookingError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, BookingError> {
        let api_host = var("CCD_API_HOST")
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| BookingError::Config("CCD_API_HOST is not set".into()))?;
        let api_protocol = parse_protocol(var("CCD_API_PROTOCOL").as_deref())?;
        let app_host = var("CCD_APP_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| api_host.clone());
        let app_protocol = parse_protocol(var("CCD_APP_PROTOCOL").as_deref())?;

        Ok(Self::new(
            format!("{api_protocol}://{}", api_host.trim()),
            format!("{app_protocol}://{}", app_host.trim()),
        ))
    }

    /// The per-request deadline. Always [`DEFAULT_TIMEOUT`].
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The absolute URL of an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        endpoints::join(&self.api_url, path)
    }
}

fn parse_protocol(raw: Option<&str>) -> Result<&'static str, BookingError> {
    match raw.map(str::trim).unwrap_or(DEFAULT_PROTOCOL) {
        "https" | "" => Ok("https"),
        "http" => Ok("http"),
        other => Err(BookingError::Config(format!("unsupported protocol: {other}"))),
    }
}
