//! Login session persistence
//!
//! The session is the only state the client keeps between runs: the bearer
//! token plus enough identity to greet the user. It is written on login,
//! cleared on logout and read once when the application services are built.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use storage::persistence::{PersistedState, PersistenceConfig, PersistenceError};
use thiserror::Error;

use crate::models::User;

/// Errors raised by session stores
#[derive(Debug, Error)]
pub enum SessionStoreError {
    /// Persistence error
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type for session store operations
pub type Result<T> = std::result::Result<T, SessionStoreError>;

/// Authenticated user session
///
/// `Session::default()` is the logged-out session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token
    pub token: String,
    /// Login email
    pub email: String,
    /// Display name, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Server user id, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Whether the session is usable
    pub is_login: bool,
}

impl Session {
    /// Session for a freshly logged-in user
    pub fn logged_in(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
            name: None,
            user_id: None,
            is_login: true,
        }
    }

    /// Attach the account details returned by the server
    pub fn with_user(mut self, user: &User) -> Self {
        self.name = Some(user.name.clone());
        self.user_id = Some(user.id);
        self.email = user.email.clone();
        self
    }

    /// Whether the session carries a usable token
    pub fn is_authenticated(&self) -> bool {
        self.is_login && !self.token.is_empty()
    }

    /// Token to attach to requests, if authenticated
    pub fn bearer(&self) -> Option<String> {
        self.is_authenticated().then(|| self.token.clone())
    }
}

/// Persisted session store
///
/// Each operation is atomic with respect to concurrent reads.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current session (the default session when logged out)
    async fn read(&self) -> Result<Session>;

    /// Replace the stored session
    async fn write(&self, session: Session) -> Result<()>;

    /// Forget the stored session
    async fn clear(&self) -> Result<()>;
}

/// Session store backed by a JSON file
///
/// # Example
///
/// ```rust,no_run
/// use lostfound_client::session::{FileSessionStore, Session, SessionStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileSessionStore::open("session.json").await?;
///     store.write(Session::logged_in("alice@example.com", "token")).await?;
///     assert!(store.read().await?.is_authenticated());
///     Ok(())
/// }
/// ```
pub struct FileSessionStore {
    state: PersistedState<Session>,
}

impl FileSessionStore {
    /// Open (or lazily create) the session file at `path`
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let config = PersistenceConfig::new(path).version(1).atomic_writes(true);
        let state = PersistedState::new(config);

        match state.init().await {
            Ok(()) => {}
            // Unreadable session file: start logged out
            Err(
                e @ (PersistenceError::Corruption(_)
                | PersistenceError::Serialization(_)
                | PersistenceError::VersionMismatch { .. }),
            ) => {
                tracing::warn!(error = %e, "discarding unreadable session file");
                state.clear().await?;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self { state })
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn read(&self) -> Result<Session> {
        Ok(self.state.get().await?)
    }

    async fn write(&self, session: Session) -> Result<()> {
        tracing::debug!(path = %self.state.path().display(), "writing session");
        Ok(self.state.set(session).await?)
    }

    async fn clear(&self) -> Result<()> {
        tracing::debug!(path = %self.state.path().display(), "clearing session");
        Ok(self.state.clear().await?)
    }
}

/// In-memory session store
///
/// Counts writes and clears so callers can assert the store was left alone.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Session>,
    writes: AtomicUsize,
    clears: AtomicUsize,
}

impl MemorySessionStore {
    /// Empty (logged-out) store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `session`
    pub fn with_session(session: Session) -> Self {
        Self { session: Mutex::new(session), ..Default::default() }
    }

    /// Number of `write` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of `clear` calls so far
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn read(&self) -> Result<Session> {
        Ok(self.session.lock().clone())
    }

    async fn write(&self, session: Session) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        *self.session.lock() = session;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.session.lock() = Session::default();
        Ok(())
    }
}
