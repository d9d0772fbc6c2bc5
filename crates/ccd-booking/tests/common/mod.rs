//! Shared fixtures: a scripted in-process transport and canned bodies.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ccd_booking::{ApiClient, ClientConfig};
use ccd_session::{COOKIE_NAME, MemoryCookieStore, SERVER_COOKIE_NAME};
use ccd_transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

pub const API: &str = "https://api.test";
pub const APP: &str = "https://app.test";

pub const LOGIN_OK: &str = r#"{
    "current_user": {"uid": "7", "roles": ["authenticated", "booker"], "name": "alice"},
    "csrf_token": "csrf-7",
    "logout_token": "logout-7"
}"#;

pub const COOKIE_7: &str =
    r#"{"uid":7,"CsrfToken":"csrf-7","logoutToken":"logout-7","roles":["authenticated","booker"]}"#;

/// The server's session cookie for [`API`], as a `Cookie` header value.
pub const SERVER_COOKIE: &str = "SESS7=server-7";

/// A store holding the persisted session of user 7.
pub fn restored_store() -> MemoryCookieStore {
    MemoryCookieStore::new()
        .with_cookie(COOKIE_NAME, COOKIE_7)
        .with_cookie(SERVER_COOKIE_NAME, SERVER_COOKIE)
}

/// One scripted answer.
pub enum Reply {
    Respond(u16, String),
    /// Responds and sets the jar's cookie for [`API`].
    RespondWithCookie(u16, String, String),
    Fail(String),
    /// Never answers.
    Hang,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Reply>,
    requests: Vec<HttpRequest>,
    cookie: Option<String>,
}

/// Answers requests from a queue, in order, and records every request.
/// Holds a one-cookie jar for [`API`].
///
/// Clones share the same script, so a test keeps one handle while the
/// client owns another.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.push(Reply::Respond(status, body.to_string()))
    }

    /// A successful login that also sets the server's session cookie.
    pub fn login_ok(&self) -> &Self {
        self.push(Reply::RespondWithCookie(
            200,
            LOGIN_OK.to_string(),
            SERVER_COOKIE.to_string(),
        ))
    }

    pub fn fail(&self, reason: &str) -> &Self {
        self.push(Reply::Fail(reason.to_string()))
    }

    pub fn hang(&self) -> &Self {
        self.push(Reply::Hang)
    }

    fn push(&self, reply: Reply) -> &Self {
        self.script.lock().unwrap().replies.push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    /// Request URLs with the API origin stripped.
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.url.trim_start_matches(API).to_string())
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().replies.len()
    }

    /// The cookie currently held for [`API`].
    pub fn cookie(&self) -> Option<String> {
        self.script.lock().unwrap().cookie.clone()
    }
}

impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.requests.push(request.clone());
            script.replies.pop_front()
        };
        match reply {
            Some(Reply::Respond(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Reply::RespondWithCookie(status, body, cookie)) => {
                self.script.lock().unwrap().cookie = Some(cookie);
                Ok(HttpResponse::new(status, body))
            }
            Some(Reply::Fail(reason)) => Err(TransportError::Request(reason.into())),
            Some(Reply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransportError::Request("hung request resumed".into()))
            }
            None => panic!("unscripted request: {} {}", request.method, request.url),
        }
    }

    fn cookie_header(&self, url: &str) -> Option<String> {
        if !url.starts_with(API) {
            return None;
        }
        self.cookie()
    }

    fn restore_cookies(&self, url: &str, header: &str) {
        if url.starts_with(API) {
            self.script.lock().unwrap().cookie = Some(header.to_string());
        }
    }
}

pub fn api(transport: &ScriptedTransport) -> ApiClient<ScriptedTransport> {
    ApiClient::new(transport.clone(), ClientConfig::new(API, APP))
}
