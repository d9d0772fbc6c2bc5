//! Request building: identity headers, CSRF injection, JSON bodies.
//!
//! [`ApiClient`] is the only code that talks to the transport. It never
//! retries; the one retry in the system belongs to the login flow.

use ccd_protocol::{
    BookingFormData, Codec, EventSubmission, JsonCodec, LoginStatus, MenuItem,
    NETWORK_FAILURE_CODE, StatusClass, endpoints,
};
use ccd_session::LoginCredentials;
use ccd_transport::{
    CredentialsMode, HttpRequest, HttpResponse, HttpTransport, Method,
    TransportError, fetch_with_timeout,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{BookingError, ClientConfig};

/// Serializes as `{}`.
#[derive(Serialize)]
struct EmptyBody {}

// ---------------------------------------------------------------------------
// ApiOutcome
// ---------------------------------------------------------------------------

/// The result of a read request, as the UI consumes it: a response code
/// plus flags, never an error value.
///
/// - 200 with a decodable body → `data` is set.
/// - 204 → `no_content`.
/// - anything else, an undecodable 200, or no response at all →
///   `error_status`. A missing response reports code 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiOutcome<R> {
    pub data: Option<R>,
    pub response_code: u16,
    pub error_status: bool,
    pub no_content: bool,
}

impl<R> ApiOutcome<R> {
    fn failed(response_code: u16) -> Self {
        Self {
            data: None,
            response_code,
            error_status: true,
            no_content: false,
        }
    }

    /// The text shown in place of content when the request failed.
    pub fn error_message(&self) -> Option<String> {
        self.error_status.then(|| {
            format!(
                "There was an error communicating with the server. Response code: {}",
                self.response_code
            )
        })
    }
}

impl<R: DeserializeOwned> ApiOutcome<R> {
    fn from_result(
        codec: &impl Codec,
        url: &str,
        result: Result<HttpResponse, TransportError>,
    ) -> Self {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(url, error = %e, "no response");
                return Self::failed(NETWORK_FAILURE_CODE);
            }
        };

        match StatusClass::classify(response.status) {
            StatusClass::Success => match codec.decode(&response.body) {
                Ok(data) => Self {
                    data: Some(data),
                    response_code: response.status,
                    error_status: false,
                    no_content: false,
                },
                Err(e) => {
                    tracing::warn!(url, error = %e, "undecodable response body");
                    Self::failed(response.status)
                }
            },
            StatusClass::NoContent => Self {
                data: None,
                response_code: response.status,
                error_status: false,
                no_content: true,
            },
            other => {
                tracing::debug!(url, status = %other, "request failed");
                Self::failed(other.response_code())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Builds requests against the configured API origin.
///
/// Every request carries `Content-Type: application/json` and the app's
/// `Origin` / `Access-Control-Allow-Origin` identity headers. When a CSRF
/// token is given and non-empty it is sent as `X-CSRF-Token`, but only if
/// the transport holds a cookie for the target: the token is never sent
/// without the authentication cookie it belongs to.
pub struct ApiClient<T: HttpTransport> {
    transport: T,
    config: ClientConfig,
    codec: JsonCodec,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            config,
            codec: JsonCodec,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends one request with the fixed timeout.
    pub async fn call(
        &self,
        csrf_token: Option<&str>,
        url: &str,
        method: Method,
        body: Option<Vec<u8>>,
        credentials: CredentialsMode,
    ) -> Result<HttpResponse, TransportError> {
        let app_url = self.config.app_url.as_str();
        let mut request = HttpRequest::new(method, url)
            .header("Origin", app_url)
            .header("Access-Control-Allow-Origin", app_url)
            .header("Content-Type", "application/json")
            .credentials(credentials);

        let csrf_token = csrf_token
            .filter(|t| !t.is_empty())
            .filter(|_| self.has_session_cookie(url));
        if let Some(token) = csrf_token {
            request = request.header(endpoints::CSRF_HEADER, token);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        tracing::debug!(%method, url, csrf = csrf_token.is_some(), "sending request");
        fetch_with_timeout(&self.transport, request, self.config.timeout()).await
    }

    fn has_session_cookie(&self, url: &str) -> bool {
        let present = self.transport.cookie_header(url).is_some();
        if !present {
            tracing::debug!(url, "no session cookie, withholding CSRF token");
        }
        present
    }

    /// Serializes `body` as JSON and sends it to `path`.
    pub async fn call_json<B: Serialize>(
        &self,
        csrf_token: Option<&str>,
        path: &str,
        method: Method,
        body: &B,
        credentials: CredentialsMode,
    ) -> Result<HttpResponse, BookingError> {
        let bytes = self.codec.encode(body)?;
        let url = self.config.endpoint(path);
        Ok(self
            .call(csrf_token, &url, method, Some(bytes), credentials)
            .await?)
    }

    /// GETs `path` and classifies the answer.
    pub async fn fetch<R: DeserializeOwned>(
        &self,
        csrf_token: Option<&str>,
        path: &str,
    ) -> ApiOutcome<R> {
        let url = self.config.endpoint(path);
        let result = self
            .call(csrf_token, &url, Method::Get, None, CredentialsMode::Include)
            .await;
        ApiOutcome::from_result(&self.codec, &url, result)
    }

    /// `POST /user/login?_format=json` with `{name, pass}`. No CSRF token.
    pub async fn login_user(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<HttpResponse, BookingError> {
        self.call_json(
            None,
            endpoints::LOGIN,
            Method::Post,
            &credentials.to_request(),
            CredentialsMode::Include,
        )
        .await
    }

    /// `POST /user/logout` with `{}`, cookies only to our own origins.
    pub async fn logout_user(&self) -> Result<HttpResponse, BookingError> {
        self.call_json(
            None,
            endpoints::LOGOUT,
            Method::Post,
            &EmptyBody {},
            CredentialsMode::SameOrigin,
        )
        .await
    }

    /// `GET /session/token`: a fresh CSRF token as plain text.
    pub async fn get_token(&self) -> Result<String, BookingError> {
        let url = self.config.endpoint(endpoints::SESSION_TOKEN);
        let response = self
            .call(None, &url, Method::Get, None, CredentialsMode::Include)
            .await?;
        match StatusClass::classify(response.status) {
            StatusClass::Success => Ok(response.text().trim().to_string()),
            _ => Err(BookingError::Status(response.status)),
        }
    }

    /// `GET /user/login_status?_format=json`.
    pub async fn login_status(&self, csrf_token: Option<&str>) -> ApiOutcome<LoginStatus> {
        self.fetch(csrf_token, endpoints::LOGIN_STATUS).await
    }

    /// `GET /api/menu_items/main?_format=json`. Public; no CSRF token.
    pub async fn fetch_main_menu(&self) -> ApiOutcome<Vec<MenuItem>> {
        self.fetch(None, endpoints::MAIN_MENU).await
    }

    /// The talent options for the booking form.
    pub async fn booking_form_data(&self, csrf_token: Option<&str>) -> ApiOutcome<BookingFormData> {
        self.fetch(csrf_token, endpoints::BOOKING_FORM_DATA).await
    }

    /// `POST /api/booking/event/create`.
    pub async fn post_event(
        &self,
        csrf_token: Option<&str>,
        event: &EventSubmission,
    ) -> Result<HttpResponse, BookingError> {
        self.call_json(
            csrf_token,
            endpoints::CREATE_EVENT,
            Method::Post,
            event,
            CredentialsMode::Include,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_encodes_as_empty_object() {
        assert_eq!(JsonCodec.encode(&EmptyBody {}).unwrap(), b"{}");
    }

    #[test]
    fn test_outcome_success_decodes() {
        let outcome: ApiOutcome<LoginStatus> =
            ApiOutcome::from_result(&JsonCodec, "u", Ok(HttpResponse::new(200, "1")));
        assert_eq!(outcome.data, Some(LoginStatus::LoggedIn));
        assert_eq!(outcome.response_code, 200);
        assert!(!outcome.error_status);
        assert!(outcome.error_message().is_none());
    }

    #[test]
    fn test_outcome_no_content() {
        let outcome: ApiOutcome<LoginStatus> =
            ApiOutcome::from_result(&JsonCodec, "u", Ok(HttpResponse::new(204, "")));
        assert!(outcome.no_content);
        assert!(!outcome.error_status);
        assert_eq!(outcome.response_code, 204);
    }

    #[test]
    fn test_outcome_error_statuses() {
        for code in [400, 403, 404, 500, 502] {
            let outcome: ApiOutcome<LoginStatus> =
                ApiOutcome::from_result(&JsonCodec, "u", Ok(HttpResponse::new(code, "")));
            assert!(outcome.error_status, "{code} should be an error");
            assert_eq!(outcome.response_code, code);
        }
    }

    #[test]
    fn test_outcome_network_failure_is_synthetic_500() {
        let outcome: ApiOutcome<LoginStatus> = ApiOutcome::from_result(
            &JsonCodec,
            "u",
            Err(TransportError::Timeout(std::time::Duration::from_millis(4000))),
        );
        assert!(outcome.error_status);
        assert_eq!(outcome.response_code, 500);
        assert_eq!(
            outcome.error_message().as_deref(),
            Some("There was an error communicating with the server. Response code: 500")
        );
    }

    #[test]
    fn test_outcome_undecodable_success_is_error() {
        let outcome: ApiOutcome<LoginStatus> =
            ApiOutcome::from_result(&JsonCodec, "u", Ok(HttpResponse::new(200, "<html>")));
        assert!(outcome.error_status);
        assert_eq!(outcome.response_code, 200);
    }
}
