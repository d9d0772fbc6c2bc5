//! # ccd-booking
//!
//! Session-cookie authentication client for the CCD booking site.
//!
//! The [`Bootstrapper`] decides on start-up whether a persisted login is
//! still valid, runs the [`LoginFlow`] when it is not, and hands out
//! [`BookingApi`] collaborators once the session is authenticated.
//!
//! ```text
//! Bootstrapper ── mount ──→ cookie store ──→ login_status
//!      │                                        │
//!      └── login ──→ LoginFlow ──→ commit cookie + context
//!                                               │
//!                   BookingApi ← SessionReader ←┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ccd_booking::prelude::*;
//!
//! # async fn run() -> Result<(), BookingError> {
//! let config = ClientConfig::from_env()?;
//! let transport = ReqwestTransport::new([&config.api_url, &config.app_url])?;
//! let api = ApiClient::new(transport, config);
//! let mut boot = Bootstrapper::new(api, FileCookieStore::new("ccd_cookies.json"));
//!
//! if boot.mount().await == BootstrapState::Unauthenticated {
//!     boot.login(&LoginCredentials::new("alice", "secret")).await?;
//! }
//! if let Some(booking) = boot.booking() {
//!     let menu = booking.main_menu().await;
//!     println!("{} menu entries", menu.data.map_or(0, |m| m.len()));
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod booking;
mod bootstrap;
mod config;
mod error;
mod login;

pub use api::{ApiClient, ApiOutcome};
pub use booking::{BookingApi, SubmissionOutcome};
pub use bootstrap::{BootstrapState, Bootstrapper, resolve_status};
pub use config::{ClientConfig, DEFAULT_PROTOCOL};
pub use error::{
    BookingError, INVALID_CREDENTIALS_MESSAGE, LoginError, LoginErrorKind,
    UNKNOWN_ERROR_MESSAGE,
};
pub use login::{LoginAction, LoginFlow, LoginStep, transition};

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::{
        ApiClient, ApiOutcome, BookingApi, BookingError, BootstrapState,
        Bootstrapper, ClientConfig, LoginError, LoginErrorKind, LoginFlow,
        SubmissionOutcome,
    };
    pub use ccd_protocol::{
        BookingFormData, EventSubmission, LoginStatus, MenuItem, Talent,
        TalentKind, TalentOption,
    };
    pub use ccd_session::{
        COOKIE_NAME, CookieStore, FileCookieStore, LoginCredentials,
        MemoryCookieStore, SERVER_COOKIE_NAME, Session, SessionReader,
        SessionSnapshot,
    };
    #[cfg(feature = "reqwest")]
    pub use ccd_transport::ReqwestTransport;
    pub use ccd_transport::{HttpTransport, TransportError};
}
