//! Session state for the CCD booking client.
//!
//! This crate holds everything about "who is logged in":
//!
//! 1. **Session**: the uid, tokens, and roles from a successful login
//!    ([`Session`])
//! 2. **Persistence**: the `ccd_login` cookie that mirrors the session
//!    across restarts, stored next to the server's own session cookie
//!    ([`LoginCookie`], [`CookieStore`])
//! 3. **Context**: the single-writer, many-reader state that
//!    collaborators read the CSRF token and roles from ([`SessionContext`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Booking facade (above)  ← login flow and bootstrapper write the context
//!     ↕
//! Session Layer (this crate)  ← session identity and persistence
//!     ↕
//! Protocol Layer (below)  ← provides LoginResponse and the JSON codec
//! ```

#![allow(async_fn_in_trait)]

mod context;
mod cookie;
mod error;
mod session;
mod store;

pub use context::{SessionContext, SessionReader, SessionSnapshot, SessionWriter};
pub use cookie::{COOKIE_NAME, LoginCookie, SERVER_COOKIE_NAME};
pub use error::SessionError;
pub use session::{LoginCredentials, Session};
pub use store::{CookieStore, FileCookieStore, MemoryCookieStore};
