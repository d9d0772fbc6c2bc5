//! The session context: the one place the current session lives.
//!
//! Every authenticated request needs the CSRF token, and role-gated
//! features need the roles. Rather than a global, the context is split
//! into two handles:
//!
//! - [`SessionWriter`]: exactly one exists. Whoever owns it (the
//!   bootstrapper) is the only code that can change the session. It is
//!   not `Clone`.
//! - [`SessionReader`]: any number of cheap clones, handed to
//!   collaborators by value. They can read the current snapshot or wait
//!   for the next change.
//!
//! # Concurrency note
//!
//! Built on `tokio::sync::watch`: the writer replaces the snapshot, and
//! readers always see the latest one. Because only one writer exists and
//! its mutators take `&mut self`, writes are serialized by the borrow
//! checker and need no lock at this level.

use tokio::sync::watch;

use crate::Session;

/// What collaborators can see of the session at one point in time.
///
/// `Default` is the empty context present at application start: no
/// tokens, no roles, no user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub uid: Option<u64>,
    pub csrf_token: String,
    pub logout_token: String,
    /// `None` until a session is established; roles are unknown, not empty.
    pub roles: Option<Vec<String>>,
}

impl SessionSnapshot {
    /// Returns `true` once a full session has been established.
    pub fn is_established(&self) -> bool {
        self.uid.is_some()
    }

    /// The CSRF token, or `None` when it is empty.
    pub fn csrf_token(&self) -> Option<&str> {
        Some(self.csrf_token.as_str()).filter(|t| !t.is_empty())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles
            .as_ref()
            .is_some_and(|roles| roles.iter().any(|r| r == role))
    }
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            uid: Some(session.uid),
            csrf_token: session.csrf_token.clone(),
            logout_token: session.logout_token.clone(),
            roles: Some(session.roles.clone()),
        }
    }
}

/// Entry point for creating a session context.
pub struct SessionContext;

impl SessionContext {
    /// Creates an empty context and returns its single writer plus a
    /// first reader.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (SessionWriter, SessionReader) {
        let (tx, rx) = watch::channel(SessionSnapshot::default());
        (SessionWriter { tx }, SessionReader { rx })
    }
}

// ---------------------------------------------------------------------------
// SessionWriter
// ---------------------------------------------------------------------------

/// The only handle that can modify the session context.
#[derive(Debug)]
pub struct SessionWriter {
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionWriter {
    /// Replaces the whole snapshot with `session` in one step, so readers
    /// never observe a half-populated context.
    pub fn establish(&mut self, session: &Session) -> bool {
        let next = SessionSnapshot::from(session);
        let changed = self.tx.send_if_modified(|snap| {
            if *snap == next {
                return false;
            }
            *snap = next;
            true
        });
        if changed {
            tracing::info!(
                uid = session.uid,
                roles = session.roles.len(),
                "session context established"
            );
        }
        changed
    }

    /// Resets to the empty context.
    pub fn clear(&mut self) -> bool {
        let changed = self.tx.send_if_modified(|snap| {
            if *snap == SessionSnapshot::default() {
                return false;
            }
            *snap = SessionSnapshot::default();
            true
        });
        if changed {
            tracing::info!("session context cleared");
        }
        changed
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    /// A new reader for this context.
    pub fn reader(&self) -> SessionReader {
        SessionReader {
            rx: self.tx.subscribe(),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionReader
// ---------------------------------------------------------------------------

/// A read-only view of the session context.
#[derive(Debug, Clone)]
pub struct SessionReader {
    rx: watch::Receiver<SessionSnapshot>,
}

impl SessionReader {
    /// The current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.rx.borrow().clone()
    }

    /// The current CSRF token, or `None` when empty.
    pub fn csrf_token(&self) -> Option<String> {
        self.rx.borrow().csrf_token().map(str::to_string)
    }

    pub fn roles(&self) -> Option<Vec<String>> {
        self.rx.borrow().roles.clone()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.rx.borrow().has_role(role)
    }

    /// Waits until the writer changes the context, then returns the new
    /// snapshot. Returns `None` once the writer has been dropped.
    pub async fn changed(&mut self) -> Option<SessionSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            uid: 5,
            csrf_token: "csrf".into(),
            logout_token: "logout".into(),
            roles: vec!["authenticated".into(), "booker".into()],
        }
    }

    #[test]
    fn test_starts_empty() {
        let (writer, reader) = SessionContext::new();
        assert_eq!(writer.snapshot(), SessionSnapshot::default());
        assert_eq!(reader.csrf_token(), None);
        assert_eq!(reader.roles(), None);
        assert!(!reader.snapshot().is_established());
    }

    #[test]
    fn test_establish_is_visible_to_every_reader() {
        let (mut writer, reader) = SessionContext::new();
        let late_reader = writer.reader();

        assert!(writer.establish(&session()));

        for r in [&reader, &late_reader] {
            let snap = r.snapshot();
            assert_eq!(snap.uid, Some(5));
            assert_eq!(snap.csrf_token, "csrf");
            assert_eq!(snap.logout_token, "logout");
            assert!(r.has_role("booker"));
        }
    }

    #[test]
    fn test_writes_report_changes_only() {
        let (mut writer, _reader) = SessionContext::new();
        assert!(writer.establish(&session()));
        assert!(!writer.establish(&session()));
        assert!(writer.clear());
        assert!(!writer.clear());
    }

    #[test]
    fn test_empty_token_reads_as_none() {
        let (mut writer, reader) = SessionContext::new();
        assert_eq!(reader.csrf_token(), None);

        let mut blank = session();
        blank.csrf_token.clear();
        writer.establish(&blank);
        assert_eq!(reader.snapshot().uid, Some(5));
        assert_eq!(reader.csrf_token(), None);
    }

    #[tokio::test]
    async fn test_reader_is_notified_of_change() {
        let (mut writer, mut reader) = SessionContext::new();
        writer.establish(&session());
        let snap = reader.changed().await.expect("writer alive");
        assert_eq!(snap.uid, Some(5));
    }

    #[tokio::test]
    async fn test_changed_ends_when_writer_dropped() {
        let (writer, mut reader) = SessionContext::new();
        drop(writer);
        assert!(reader.changed().await.is_none());
    }
}
