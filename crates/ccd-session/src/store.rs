//! Where the client's cookies live between runs.
//!
//! The session layer does not care whether cookies sit in memory, in a
//! file, or in a browser. It only needs something that implements
//! [`CookieStore`]: load a value by name, save one, clear one.
//!
//! Two names are used: [`COOKIE_NAME`](crate::COOKIE_NAME) holds the
//! login mirror, and [`SERVER_COOKIE_NAME`](crate::SERVER_COOKIE_NAME)
//! holds the server's own authentication cookie for the API origin.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use ccd_protocol::{Codec, JsonCodec};

use crate::SessionError;

/// Persists named raw cookie values.
pub trait CookieStore: Send + Sync + 'static {
    /// Returns the value stored under `name`, or `None`.
    async fn load(&self, name: &str) -> Result<Option<String>, SessionError>;

    /// Replaces the value stored under `name`.
    async fn save(&self, name: &str, value: &str) -> Result<(), SessionError>;

    /// Removes the value stored under `name`. Clearing a missing name is
    /// not an error.
    async fn clear(&self, name: &str) -> Result<(), SessionError>;
}

type Cookies = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// MemoryCookieStore
// ---------------------------------------------------------------------------

/// An in-memory [`CookieStore`].
///
/// Clones share the same map, so a test can keep a handle and inspect
/// what the client wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieStore {
    cookies: Arc<Mutex<Cookies>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name = value` to the store and returns it.
    pub fn with_cookie(self, name: &str, value: impl Into<String>) -> Self {
        self.lock().insert(name.to_string(), value.into());
        self
    }

    /// The value under `name`, without going through the async trait.
    pub fn get(&self, name: &str) -> Option<String> {
        self.lock().get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Cookies> {
        self.cookies.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CookieStore for MemoryCookieStore {
    async fn load(&self, name: &str) -> Result<Option<String>, SessionError> {
        Ok(self.get(name))
    }

    async fn save(&self, name: &str, value: &str) -> Result<(), SessionError> {
        self.lock().insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, name: &str) -> Result<(), SessionError> {
        self.lock().remove(name);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileCookieStore
// ---------------------------------------------------------------------------

/// A [`CookieStore`] backed by a single JSON file mapping names to values.
///
/// A missing file means "no cookies". The parent directory is created on
/// the first save, and the file is removed once its last cookie is
/// cleared. A file that does not decode is reported by `load` and
/// replaced by the next `save`.
#[derive(Debug, Clone)]
pub struct FileCookieStore {
    path: PathBuf,
    codec: JsonCodec,
}

impl FileCookieStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            codec: JsonCodec,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<Cookies, SessionError> {
        match tokio::fs::read(&self.path).await {
            Ok(raw) => self.codec.decode(&raw).map_err(|e| {
                SessionError::MalformedCookie(format!(
                    "{}: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Cookies::new()),
            Err(e) => Err(SessionError::CookieStore(e)),
        }
    }

    async fn write(&self, cookies: &Cookies) -> Result<(), SessionError> {
        if cookies.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Ok(()) => {
                    let path = self.path.display();
                    tracing::debug!(path = %path, "cookie file removed");
                    Ok(())
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(SessionError::CookieStore(e)),
            };
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(SessionError::CookieStore)?;
            }
        }
        let bytes = self.codec.encode(cookies)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(SessionError::CookieStore)
    }

    /// The current map, or an empty one if the file is unreadable as JSON.
    async fn read_for_update(&self) -> Result<Cookies, SessionError> {
        match self.read().await {
            Err(SessionError::MalformedCookie(reason)) => {
                tracing::warn!(%reason, "discarding undecodable cookie file");
                Ok(Cookies::new())
            }
            other => other,
        }
    }
}

impl CookieStore for FileCookieStore {
    async fn load(&self, name: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read().await?.remove(name))
    }

    async fn save(&self, name: &str, value: &str) -> Result<(), SessionError> {
        let mut cookies = self.read_for_update().await?;
        cookies.insert(name.to_string(), value.to_string());
        self.write(&cookies).await?;
        tracing::debug!(path = %self.path.display(), name, "cookie saved");
        Ok(())
    }

    async fn clear(&self, name: &str) -> Result<(), SessionError> {
        let mut cookies = self.read_for_update().await?;
        if cookies.remove(name).is_none() && !cookies.is_empty() {
            return Ok(());
        }
        self.write(&cookies).await?;
        tracing::debug!(path = %self.path.display(), name, "cookie cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryCookieStore::new();
        assert_eq!(store.load("a").await.unwrap(), None);

        store.save("a", "value").await.unwrap();
        assert_eq!(store.load("a").await.unwrap().as_deref(), Some("value"));
        assert_eq!(store.load("b").await.unwrap(), None);

        store.clear("a").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_memory_store_names_are_independent() {
        let store = MemoryCookieStore::new()
            .with_cookie("a", "1")
            .with_cookie("b", "2");

        store.clear("a").await.unwrap();

        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("b").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_cookies() {
        let store = MemoryCookieStore::new();
        let handle = store.clone();
        store.save("a", "shared").await.unwrap();
        assert_eq!(handle.get("a").as_deref(), Some("shared"));
    }
}
