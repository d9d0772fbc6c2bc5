//! The session bootstrapper: decides whether this client is logged in.
//!
//! ```text
//! Initializing → CheckingCookie → QueryingStatus → Authenticated
//!                                               ↘ Unauthenticated
//!                                               ↘ Errored
//! ```
//!
//! The bootstrapper owns the [`SessionWriter`] and the [`CookieStore`].
//! Together with the login commit, restoring a cookie is the only path
//! that writes the session context.
//!
//! Two cookies are persisted: the `ccd_login` mirror of the session, and
//! the server's own authentication cookie for the API origin, which is
//! fed back into the transport on restore. The CSRF token restored from
//! the mirror only goes out once that server cookie is in the transport.
//!
//! `QueryingStatus` is re-entered once per change of its two inputs, the
//! persisted cookie and the CSRF token in the context, and after every
//! successful login. Calling [`refresh`](Bootstrapper::refresh) with
//! unchanged inputs sends nothing.
//! `Errored` is never left: once the status query has failed, the
//! bootstrapper stops querying for the rest of its life.

use std::fmt;

use ccd_protocol::LoginStatus;
use ccd_session::{
    COOKIE_NAME, CookieStore, LoginCookie, LoginCredentials, SERVER_COOKIE_NAME, Session,
    SessionContext, SessionReader, SessionWriter,
};
use ccd_transport::HttpTransport;

use crate::{ApiClient, ApiOutcome, BookingApi, BookingError, LoginFlow};

/// Where the bootstrapper is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Initializing,
    CheckingCookie,
    QueryingStatus,
    Authenticated,
    Unauthenticated,
    /// The status query failed. `response_code` is 500 when no response
    /// arrived.
    Errored { response_code: u16 },
}

impl BootstrapState {
    /// Returns `true` while the UI should show a loading indicator.
    pub fn is_loading(self) -> bool {
        matches!(
            self,
            Self::Initializing | Self::CheckingCookie | Self::QueryingStatus
        )
    }

    /// The text shown in place of the app when bootstrapping failed.
    pub fn message(self) -> Option<String> {
        match self {
            Self::Errored { response_code } => Some(format!(
                "There was an error communicating with the server. Response code: {response_code}"
            )),
            _ => None,
        }
    }
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initializing => f.write_str("initializing"),
            Self::CheckingCookie => f.write_str("checking cookie"),
            Self::QueryingStatus => f.write_str("querying status"),
            Self::Authenticated => f.write_str("authenticated"),
            Self::Unauthenticated => f.write_str("unauthenticated"),
            Self::Errored { response_code } => write!(f, "errored ({response_code})"),
        }
    }
}

/// Maps a status query result to the state it leads to.
///
/// Any failed query is `Errored`. Without a cookie the answer is
/// `Unauthenticated` whatever the server says.
pub fn resolve_status(outcome: &ApiOutcome<LoginStatus>, has_cookie: bool) -> BootstrapState {
    if outcome.error_status {
        return BootstrapState::Errored {
            response_code: outcome.response_code,
        };
    }
    match outcome.data {
        Some(status) if status.is_logged_in() && has_cookie => {
            BootstrapState::Authenticated
        }
        _ => BootstrapState::Unauthenticated,
    }
}

/// The inputs of the last status query.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Inputs {
    cookie: Option<LoginCookie>,
    csrf_token: String,
}

/// Drives the bootstrap state machine and commits login results.
///
/// All mutating methods take `&mut self`, so at most one of them runs at
/// a time.
pub struct Bootstrapper<T: HttpTransport, S: CookieStore> {
    api: ApiClient<T>,
    store: S,
    writer: SessionWriter,
    state: BootstrapState,
    cookie: Option<LoginCookie>,
    evaluated: Option<Inputs>,
}

impl<T: HttpTransport, S: CookieStore> Bootstrapper<T, S> {
    /// Creates a bootstrapper with an empty session context.
    pub fn new(api: ApiClient<T>, store: S) -> Self {
        let (writer, _reader) = SessionContext::new();
        Self {
            api,
            store,
            writer,
            state: BootstrapState::Initializing,
            cookie: None,
            evaluated: None,
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// A read-only handle on the session context.
    pub fn reader(&self) -> SessionReader {
        self.writer.reader()
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The booking collaborators, available only once authenticated.
    pub fn booking(&self) -> Option<BookingApi<'_, T>> {
        (self.state == BootstrapState::Authenticated)
            .then(|| BookingApi::new(&self.api, self.writer.reader()))
    }

    /// Reads the persisted cookie, seeds the context from it, and queries
    /// the login status.
    ///
    /// Mounting again behaves like [`refresh`](Self::refresh): with the
    /// same cookie no further status query is sent.
    pub async fn mount(&mut self) -> BootstrapState {
        if self.state == BootstrapState::Initializing {
            self.set_state(BootstrapState::CheckingCookie);
        }
        self.refresh().await
    }

    /// Re-reads the persisted cookie and re-evaluates if it or the CSRF
    /// token changed since the last status query.
    pub async fn refresh(&mut self) -> BootstrapState {
        let cookie = self.load_cookie().await;
        if cookie != self.cookie {
            match &cookie {
                Some(cookie) => {
                    tracing::info!(uid = cookie.uid, "restoring session from cookie");
                    self.restore_server_cookie().await;
                    self.writer.establish(&cookie.clone().into_session());
                }
                None => {
                    self.writer.clear();
                }
            }
            self.cookie = cookie;
        }
        self.evaluate().await
    }

    /// Runs the login flow and commits the result.
    ///
    /// The cookies are saved before the context is written. If a save
    /// fails, the context does not change and the error is returned. A
    /// committed login always re-queries the status, even when it
    /// produced the same tokens as the last query saw.
    pub async fn login(
        &mut self,
        credentials: &LoginCredentials,
    ) -> Result<Session, BookingError> {
        let session = LoginFlow::new(&self.api).login(credentials).await?;
        self.commit(&session).await?;
        self.evaluate().await;
        Ok(session)
    }

    /// Logs out on the server, then drops the cookie and the context.
    ///
    /// The logout response is only logged: the local session is cleared
    /// whatever the server answered. The context is cleared even when the
    /// store cannot forget the cookies; that error is returned afterwards.
    pub async fn logout(&mut self) -> Result<BootstrapState, BookingError> {
        match self.api.logout_user().await {
            Ok(response) => tracing::debug!(status = response.status, "logout answered"),
            Err(e) => tracing::warn!(error = %e, "logout request failed"),
        }
        let cleared = self.forget_cookies().await;
        self.cookie = None;
        self.writer.clear();
        tracing::info!("logged out");
        let state = self.evaluate().await;
        cleared?;
        Ok(state)
    }

    async fn commit(&mut self, session: &Session) -> Result<(), BookingError> {
        let cookie = LoginCookie::from(session);
        let encoded = cookie.encode()?;
        let api_url = self.api.config().api_url.as_str();
        match self.api.transport().cookie_header(api_url) {
            Some(header) => self.persist(SERVER_COOKIE_NAME, &header).await?,
            None => tracing::warn!("login answered without a session cookie"),
        }
        self.persist(COOKIE_NAME, &encoded).await?;
        self.writer.establish(session);
        self.cookie = Some(cookie);
        self.evaluated = None;
        Ok(())
    }

    async fn persist(&self, name: &str, value: &str) -> Result<(), BookingError> {
        self.store.save(name, value).await.map_err(|e| {
            tracing::warn!(name, error = %e, "could not persist cookie");
            e.into()
        })
    }

    /// Clears both persisted cookies, attempting each one. Returns the
    /// first failure.
    async fn forget_cookies(&self) -> Result<(), BookingError> {
        let mirror = self.store.clear(COOKIE_NAME).await;
        let server = self.store.clear(SERVER_COOKIE_NAME).await;
        for result in [&mirror, &server] {
            if let Err(e) = result {
                tracing::warn!(error = %e, "could not clear persisted cookie");
            }
        }
        mirror?;
        server?;
        Ok(())
    }

    /// Hands the persisted server cookie back to the transport.
    async fn restore_server_cookie(&self) {
        match self.store.load(SERVER_COOKIE_NAME).await {
            Ok(Some(header)) => {
                let api_url = self.api.config().api_url.as_str();
                self.api.transport().restore_cookies(api_url, &header);
            }
            Ok(None) => tracing::debug!("no persisted server cookie"),
            Err(e) => tracing::warn!(error = %e, "could not read server cookie"),
        }
    }

    async fn load_cookie(&self) -> Option<LoginCookie> {
        let raw = match self.store.load(COOKIE_NAME).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "could not read login cookie");
                return None;
            }
        };
        match LoginCookie::decode(&raw) {
            Ok(cookie) => Some(cookie),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring login cookie");
                None
            }
        }
    }

    async fn evaluate(&mut self) -> BootstrapState {
        if let BootstrapState::Errored { .. } = self.state {
            tracing::debug!("bootstrap errored, not querying status");
            return self.state;
        }

        let inputs = Inputs {
            cookie: self.cookie.clone(),
            csrf_token: self.writer.snapshot().csrf_token,
        };
        if self.evaluated.as_ref() == Some(&inputs) {
            return self.state;
        }

        self.set_state(BootstrapState::QueryingStatus);
        let outcome = self.api.login_status(Some(&inputs.csrf_token)).await;
        let next = resolve_status(&outcome, inputs.cookie.is_some());
        self.evaluated = Some(inputs);
        self.set_state(next);
        next
    }

    fn set_state(&mut self, next: BootstrapState) {
        if self.state != next {
            match next {
                BootstrapState::Errored { response_code } => {
                    tracing::warn!(response_code, "bootstrap failed")
                }
                _ => tracing::info!(from = %self.state, to = %next, "bootstrap state"),
            }
            self.state = next;
        }
    }
}
