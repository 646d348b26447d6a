//! Repositories
//!
//! Each repository method builds an [`Invocation`] around exactly one call
//! to the remote API (or, for session reads and logout, the local store).
//! Nothing is cached: every read goes back to the server.

use std::sync::Arc;

use lostfound_client::models::{Ack, LostFoundObject, ObjectFilter, ObjectStatus, User};
use lostfound_client::session::{Session, SessionStore};
use lostfound_client::LostFoundApi;

use crate::invocation::Invocation;

/// Login, registration and the persisted session
#[derive(Clone)]
pub struct AuthRepository {
    api: Arc<dyn LostFoundApi>,
    store: Arc<dyn SessionStore>,
}

impl AuthRepository {
    /// Create a repository over `api` and `store`
    pub fn new(api: Arc<dyn LostFoundApi>, store: Arc<dyn SessionStore>) -> Self {
        Self { api, store }
    }

    /// Authenticate, then persist the session and arm the client's token
    ///
    /// The store is only written when the server accepts the credentials.
    pub fn login(&self, email: impl Into<String>, password: impl Into<String>) -> Invocation<Session> {
        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);
        let email = email.into();
        let password = password.into();

        Invocation::new(async move {
            let login = api.login(&email, &password).await?;

            let mut session = Session::logged_in(email, login.token);
            if let Some(user) = &login.user {
                session = session.with_user(user);
            }

            store.write(session.clone()).await?;
            api.set_token(session.bearer());
            tracing::info!(email = %session.email, "logged in");
            Ok(session)
        })
    }

    /// Create an account
    pub fn register(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Invocation<Ack> {
        let api = Arc::clone(&self.api);
        let (name, email, password) = (name.into(), email.into(), password.into());

        Invocation::new(async move { Ok(api.register(&name, &email, &password).await?) })
    }

    /// Forget the session locally
    pub fn logout(&self) -> Invocation<()> {
        let api = Arc::clone(&self.api);
        let store = Arc::clone(&self.store);

        Invocation::local(async move {
            store.clear().await?;
            api.set_token(None);
            tracing::info!("logged out");
            Ok(())
        })
    }

    /// Stored session
    pub fn session(&self) -> Invocation<Session> {
        let store = Arc::clone(&self.store);
        Invocation::local(async move { Ok(store.read().await?) })
    }
}

/// Profile of the signed-in user
#[derive(Clone)]
pub struct UserRepository {
    api: Arc<dyn LostFoundApi>,
}

impl UserRepository {
    /// Create a repository over `api`
    pub fn new(api: Arc<dyn LostFoundApi>) -> Self {
        Self { api }
    }

    /// Fetch the profile
    pub fn me(&self) -> Invocation<User> {
        let api = Arc::clone(&self.api);
        Invocation::new(async move { Ok(api.me().await?) })
    }
}

/// Lost & found records
#[derive(Clone)]
pub struct ObjectRepository {
    api: Arc<dyn LostFoundApi>,
}

impl ObjectRepository {
    /// Create a repository over `api`
    pub fn new(api: Arc<dyn LostFoundApi>) -> Self {
        Self { api }
    }

    /// Fetch many
    pub fn list(&self, filter: ObjectFilter) -> Invocation<Vec<LostFoundObject>> {
        let api = Arc::clone(&self.api);
        Invocation::new(async move { Ok(api.list_objects(&filter).await?) })
    }

    /// Fetch one
    pub fn get(&self, id: i64) -> Invocation<LostFoundObject> {
        let api = Arc::clone(&self.api);
        Invocation::new(async move { Ok(api.get_object(id).await?) })
    }

    /// Create a record; yields the id the server assigned
    pub fn create(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
        status: ObjectStatus,
    ) -> Invocation<i64> {
        let api = Arc::clone(&self.api);
        let (title, description) = (title.into(), description.into());

        Invocation::new(async move {
            let id = api.create_object(&title, &description, status).await?;
            tracing::debug!(id, "object created");
            Ok(id)
        })
    }

    /// Replace title, description and completion flag
    pub fn update(
        &self,
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        is_completed: bool,
    ) -> Invocation<Ack> {
        let api = Arc::clone(&self.api);
        let (title, description) = (title.into(), description.into());

        Invocation::new(async move {
            Ok(api.update_object(id, &title, &description, is_completed).await?)
        })
    }

    /// Delete a record
    pub fn delete(&self, id: i64) -> Invocation<Ack> {
        let api = Arc::clone(&self.api);
        Invocation::new(async move { Ok(api.delete_object(id).await?) })
    }
}
