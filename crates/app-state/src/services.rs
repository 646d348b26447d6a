//! Application services
//!
//! [`AppServices`] is built once at start-up and handed to every screen. It
//! owns the API client and session store and exposes the repositories.

use std::sync::Arc;

use lostfound_client::session::{Session, SessionStore};
use lostfound_client::{ClientConfig, DelcomApiClient, LostFoundApi};

use crate::notification::Result;
use crate::repository::{AuthRepository, ObjectRepository, UserRepository};

/// Repositories sharing one client and one session store
#[derive(Clone)]
pub struct AppServices {
    auth: AuthRepository,
    users: UserRepository,
    objects: ObjectRepository,
    initial_session: Session,
}

impl AppServices {
    /// Wire the repositories to `api` and `store`
    ///
    /// Reads the stored session once and arms the client's token with it.
    pub async fn bootstrap(
        api: Arc<dyn LostFoundApi>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let session = store.read().await?;
        api.set_token(session.bearer());
        tracing::debug!(logged_in = session.is_authenticated(), "services ready");

        Ok(Self {
            auth: AuthRepository::new(Arc::clone(&api), store),
            users: UserRepository::new(Arc::clone(&api)),
            objects: ObjectRepository::new(api),
            initial_session: session,
        })
    }

    /// Build the HTTP client from `config` and bootstrap over it
    pub async fn connect(config: ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self> {
        let api = DelcomApiClient::new(config)?;
        Self::bootstrap(Arc::new(api), store).await
    }

    /// Session read at start-up
    pub fn initial_session(&self) -> &Session {
        &self.initial_session
    }

    /// Authentication repository
    pub fn auth(&self) -> &AuthRepository {
        &self.auth
    }

    /// Profile repository
    pub fn users(&self) -> &UserRepository {
        &self.users
    }

    /// Object repository
    pub fn objects(&self) -> &ObjectRepository {
        &self.objects
    }
}
