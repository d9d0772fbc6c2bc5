//! HTTP transport layer for the CCD booking client.
//!
//! Provides the [`HttpTransport`] trait that abstracts over "something that
//! can send one HTTP request and hand back the response", plus
//! [`fetch_with_timeout`], which races a request against a deadline.
//!
//! The transport speaks bytes only. Turning bodies into typed values is the
//! protocol layer's job.
//!
//! # Feature Flags
//!
//! - `reqwest` (default): [`ReqwestTransport`], backed by `reqwest` with a
//!   cookie jar for the server's authentication cookie

#![allow(async_fn_in_trait)]

mod error;
mod fetch;
#[cfg(feature = "reqwest")]
mod reqwest_client;

pub use error::TransportError;
pub use fetch::{DEFAULT_TIMEOUT, fetch_with_timeout};
#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestTransport;

use std::fmt;

/// The HTTP methods the booking API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// Whether a request carries the cookie jar.
///
/// Mirrors the browser `credentials` option:
///
/// - **Include**: always send cookies.
/// - **SameOrigin**: send cookies only to an origin the transport trusts.
/// - **Omit**: never send cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    #[default]
    Include,
    SameOrigin,
    Omit,
}

/// A single outbound HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub credentials: CredentialsMode,
}

impl HttpRequest {
    /// Creates a request with no headers, no body, and `Include` credentials.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
            credentials: CredentialsMode::Include,
        }
    }

    /// Appends a header.
    pub fn header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the credentials mode.
    pub fn credentials(mut self, mode: CredentialsMode) -> Self {
        self.credentials = mode;
        self
    }

    /// Looks up a header value, ignoring ASCII case in the name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response with the given status and body and no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// The body as text. Invalid UTF-8 is replaced, not rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Looks up a header value, ignoring ASCII case in the name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(
    headers: &'a [(String, String)],
    name: &str,
) -> Option<&'a str> {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Sends HTTP requests.
///
/// Implementations resolve with whatever status the server returned; a
/// non-2xx status is NOT an error at this layer. `Err` means no response
/// was obtained at all.
pub trait HttpTransport: Send + Sync + 'static {
    /// Sends one request and waits for the full response.
    async fn send(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError>;

    /// The `Cookie` header this transport would attach to a request for
    /// `url`, or `None` when it holds no cookie for that origin.
    ///
    /// Transports without a cookie jar keep the default.
    fn cookie_header(&self, _url: &str) -> Option<String> {
        None
    }

    /// Seeds the jar for `url` with the pairs of a `Cookie` header value,
    /// as returned by [`cookie_header`](Self::cookie_header).
    fn restore_cookies(&self, _url: &str, _header: &str) {}
}

impl<T: HttpTransport> HttpTransport for std::sync::Arc<T> {
    async fn send(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }

    fn cookie_header(&self, url: &str) -> Option<String> {
        (**self).cookie_header(url)
    }

    fn restore_cookies(&self, url: &str, header: &str) {
        (**self).restore_cookies(url, header)
    }
}
