//! Collaborators of an authenticated session: menu, booking form, events.
//!
//! These only read the session. The CSRF token is looked up through a
//! [`SessionReader`] at call time, so a collaborator created before a
//! re-login sends the new token.

use std::fmt;

use ccd_protocol::{BookingFormData, EventSubmission, MenuItem, StatusClass};
use ccd_session::SessionReader;
use ccd_transport::HttpTransport;

use crate::{ApiClient, ApiOutcome, BookingError};

/// How an event submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// 200: the event exists.
    Created { title: String },
    /// The server answered with another status.
    Rejected { status: u16 },
    /// No response.
    Failed { reason: String },
}

impl SubmissionOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }

    /// The message shown under the form.
    pub fn message(&self) -> String {
        match self {
            Self::Created { title } => format!("{title} created!"),
            Self::Rejected { status } => format!(
                "There was an error communicating with the server: Error code: {status}"
            ),
            Self::Failed { reason } => format!(
                "There was an error communicating with the server: Error message: {reason}"
            ),
        }
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Booking-site calls made on behalf of the current session.
pub struct BookingApi<'a, T: HttpTransport> {
    api: &'a ApiClient<T>,
    session: SessionReader,
}

impl<'a, T: HttpTransport> BookingApi<'a, T> {
    pub fn new(api: &'a ApiClient<T>, session: SessionReader) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &SessionReader {
        &self.session
    }

    /// The site's main menu. Public, sent without a CSRF token.
    pub async fn main_menu(&self) -> ApiOutcome<Vec<MenuItem>> {
        self.api.fetch_main_menu().await
    }

    /// Talent options for the booking form.
    pub async fn form_data(&self) -> ApiOutcome<BookingFormData> {
        let token = self.session.csrf_token();
        self.api.booking_form_data(token.as_deref()).await
    }

    /// Submits `event`.
    pub async fn create_event(&self, event: &EventSubmission) -> SubmissionOutcome {
        let token = self.session.csrf_token();
        let outcome = match self.api.post_event(token.as_deref(), event).await {
            Ok(response) => match StatusClass::classify(response.status) {
                StatusClass::Success => SubmissionOutcome::Created {
                    title: event.event_title.clone(),
                },
                _ => SubmissionOutcome::Rejected {
                    status: response.status,
                },
            },
            Err(e) => SubmissionOutcome::Failed {
                reason: e.to_string(),
            },
        };
        tracing::info!(created = outcome.is_created(), "event submission");
        outcome
    }

    /// A fresh CSRF token from the server. The session context is not
    /// updated.
    pub async fn session_token(&self) -> Result<String, BookingError> {
        self.api.get_token().await
    }
}
