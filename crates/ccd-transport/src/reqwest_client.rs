//! HTTP transport implementation using `reqwest`.

use std::sync::Arc;

use reqwest::cookie::{CookieStore as _, Jar};
use reqwest::{Client, Url};

use crate::{
    CredentialsMode, HttpRequest, HttpResponse, HttpTransport, Method,
    TransportError,
};

/// A `reqwest`-backed [`HttpTransport`].
///
/// Holds one cookie jar shared by two clients: one that attaches the jar
/// and one that never does. [`CredentialsMode`] picks between them per
/// request. Redirects are not followed, so callers observe 3xx statuses
/// as-is.
pub struct ReqwestTransport {
    with_cookies: Client,
    without_cookies: Client,
    jar: Arc<Jar>,
    trusted_origins: Vec<String>,
}

impl ReqwestTransport {
    /// Builds a transport whose `SameOrigin` requests carry cookies only
    /// when the target matches one of `trusted_origins`.
    pub fn new<I, S>(trusted_origins: I) -> Result<Self, TransportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut origins = Vec::new();
        for raw in trusted_origins {
            let url = Url::parse(raw.as_ref()).map_err(|e| {
                TransportError::InvalidUrl(format!("{}: {e}", raw.as_ref()))
            })?;
            origins.push(url.origin().ascii_serialization());
        }

        let jar = Arc::new(Jar::default());
        let with_cookies = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        let without_cookies = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        tracing::debug!(origins = ?origins, "reqwest transport ready");

        Ok(Self {
            with_cookies,
            without_cookies,
            jar,
            trusted_origins: origins,
        })
    }

    fn is_trusted(&self, url: &Url) -> bool {
        let origin = url.origin().ascii_serialization();
        self.trusted_origins.iter().any(|o| *o == origin)
    }

    fn client_for(&self, mode: CredentialsMode, url: &Url) -> &Client {
        match mode {
            CredentialsMode::Include => &self.with_cookies,
            CredentialsMode::SameOrigin if self.is_trusted(url) => {
                &self.with_cookies
            }
            CredentialsMode::SameOrigin | CredentialsMode::Omit => {
                &self.without_cookies
            }
        }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let url = Url::parse(&request.url).map_err(|e| {
            TransportError::InvalidUrl(format!("{}: {e}", request.url))
        })?;
        let client = self.client_for(request.credentials, &url);

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Request(Box::new(e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(Box::new(e)))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    fn cookie_header(&self, url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        let value = self.jar.cookies(&url)?;
        value.to_str().ok().map(str::to_string)
    }

    fn restore_cookies(&self, url: &str, header: &str) {
        let Ok(url) = Url::parse(url) else {
            tracing::warn!(url, "not restoring cookies for an invalid url");
            return;
        };
        let mut restored = 0;
        let pairs = header.split(';').map(str::trim).filter(|p| !p.is_empty());
        for pair in pairs {
            self.jar.add_cookie_str(pair, &url);
            restored += 1;
        }
        tracing::debug!(url = %url, restored, "cookies restored into jar");
    }
}
