//! The login flow: submit credentials, clear a stale session at most once.
//!
//! A 403 on login means the server still holds a session for this
//! client that conflicts with the new login. The flow logs out and
//! resubmits the same credentials exactly once:
//!
//! ```text
//!   FirstAttempt ──403──→ LoggingOut ──200/302──→ RetryAttempt
//!        │                     │                       │
//!        │ 200                 │ other                 │ 200
//!        ▼                     ▼                       ▼
//!     Accept           Fail(SessionConflict)        Accept
//! ```
//!
//! The retry resubmits the original request as-is, without fetching a
//! fresh CSRF token from `/session/token` first.
//!
//! All decisions live in [`transition`], a pure function over
//! `(step, status)`. `RetryAttempt` has no edge back to `LoggingOut`,
//! which is what bounds the flow to three requests.

use ccd_protocol::{Codec, JsonCodec, LoginResponse, StatusClass};
use ccd_session::{LoginCredentials, Session};
use ccd_transport::{HttpResponse, HttpTransport};

use crate::{ApiClient, BookingError, LoginError, LoginErrorKind};

/// Where the flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    FirstAttempt,
    LoggingOut,
    RetryAttempt,
}

/// What the flow does next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    /// Send the logout request.
    Logout,
    /// Send the login request again.
    Retry,
    /// Parse the 200 body into a session.
    Accept,
    /// Stop with this error.
    Fail(LoginErrorKind),
}

/// The transition table.
pub fn transition(step: LoginStep, status: StatusClass) -> LoginAction {
    use LoginStep::{FirstAttempt, LoggingOut, RetryAttempt};

    match (step, status) {
        (FirstAttempt, StatusClass::Forbidden) => LoginAction::Logout,
        (RetryAttempt, StatusClass::Forbidden) => {
            LoginAction::Fail(LoginErrorKind::SessionConflict)
        }
        (FirstAttempt | RetryAttempt, StatusClass::Success) => LoginAction::Accept,
        (FirstAttempt | RetryAttempt, StatusClass::ClientError) => {
            LoginAction::Fail(LoginErrorKind::InvalidCredentials)
        }
        (FirstAttempt | RetryAttempt, other) => LoginAction::Fail(LoginErrorKind::Unknown {
            status: other.status(),
        }),

        (LoggingOut, StatusClass::Success | StatusClass::Redirect) => LoginAction::Retry,
        (LoggingOut, StatusClass::NetworkFailure) => {
            LoginAction::Fail(LoginErrorKind::Unknown { status: None })
        }
        (LoggingOut, _) => LoginAction::Fail(LoginErrorKind::SessionConflict),
    }
}

/// Runs the login flow against an [`ApiClient`].
///
/// The flow never touches the session context or the cookie store. On
/// success it hands back a [`Session`]; persisting it is the caller's job.
pub struct LoginFlow<'a, T: HttpTransport> {
    api: &'a ApiClient<T>,
}

impl<'a, T: HttpTransport> LoginFlow<'a, T> {
    pub fn new(api: &'a ApiClient<T>) -> Self {
        Self { api }
    }

    /// Logs in with `credentials`.
    ///
    /// Requests are strictly sequential: the retry is only sent after the
    /// logout response has been observed.
    ///
    /// # Errors
    /// - [`LoginErrorKind::InvalidCredentials`] on a 400 (first or retry)
    /// - [`LoginErrorKind::SessionConflict`] when logout + retry did not help
    /// - [`LoginErrorKind::Unknown`] for anything else, including no response
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, LoginError> {
        let mut step = LoginStep::FirstAttempt;

        loop {
            let result = match step {
                LoginStep::FirstAttempt | LoginStep::RetryAttempt => {
                    self.api.login_user(credentials).await
                }
                LoginStep::LoggingOut => self.api.logout_user().await,
            };

            let (status, response, failure) = match result {
                Ok(response) => (StatusClass::classify(response.status), Some(response), None),
                Err(e) => (StatusClass::NetworkFailure, None, Some(e)),
            };

            let action = transition(step, status);
            tracing::debug!(?step, %status, ?action, "login flow step");

            match action {
                LoginAction::Logout => {
                    tracing::info!("stale session blocked login, logging out first");
                    step = LoginStep::LoggingOut;
                }
                LoginAction::Retry => step = LoginStep::RetryAttempt,
                LoginAction::Accept => {
                    let Some(response) = response else {
                        return Err(LoginError::new(LoginErrorKind::Unknown { status: None }));
                    };
                    let session = parse_session(&response)?;
                    tracing::info!(
                        uid = session.uid,
                        retried = step == LoginStep::RetryAttempt,
                        "login succeeded"
                    );
                    return Ok(session);
                }
                LoginAction::Fail(kind) => {
                    tracing::info!(%kind, "login failed");
                    return Err(match failure {
                        Some(e) => LoginError::with_source(kind, e),
                        None => LoginError::new(kind),
                    });
                }
            }
        }
    }
}

fn parse_session(response: &HttpResponse) -> Result<Session, LoginError> {
    JsonCodec
        .decode::<LoginResponse>(&response.body)
        .map(Session::from)
        .map_err(|e| {
            tracing::warn!(error = %e, "login response did not match the expected shape");
            LoginError::with_source(
                LoginErrorKind::Unknown {
                    status: Some(response.status),
                },
                BookingError::Protocol(e),
            )
        })
}
