//! In-memory stand-in for the lost & found service
//!
//! [`InMemoryApi`] keeps users and objects in a map and enforces the same
//! rules the server does (credentials, bearer token, ownership), so
//! repository and screen tests can run without a network.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::LostFoundApi;
use crate::http::ApiError;
use crate::models::{Ack, LoginData, LostFoundObject, ObjectFilter, ObjectStatus, User};
use crate::Result;

#[derive(Debug, Default)]
struct Inner {
    users: Vec<(User, String)>,
    objects: BTreeMap<i64, LostFoundObject>,
    next_user_id: i64,
    next_object_id: i64,
    token: Option<String>,
    fail_next: Option<ApiError>,
}

/// Fake service backed by in-memory maps
#[derive(Debug, Default)]
pub struct InMemoryApi {
    inner: Mutex<Inner>,
    calls: AtomicUsize,
}

fn token_for(user_id: i64) -> String {
    format!("token-{user_id}")
}

impl InMemoryApi {
    /// Empty service
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account; returns its id
    pub fn add_user(&self, name: &str, email: &str, password: &str) -> i64 {
        let mut inner = self.inner.lock();
        inner.next_user_id += 1;
        let id = inner.next_user_id;
        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            photo: None,
            created_at: None,
            updated_at: None,
        };
        inner.users.push((user, password.to_string()));
        id
    }

    /// Add an object owned by `user_id`; returns its id
    pub fn add_object(&self, user_id: i64, title: &str, description: &str, status: ObjectStatus) -> i64 {
        let mut inner = self.inner.lock();
        inner.next_object_id += 1;
        let id = inner.next_object_id;
        inner.objects.insert(id, object(id, user_id, title, description, status));
        id
    }

    /// Insert an object with a fixed id
    pub fn insert_object(&self, object: LostFoundObject) {
        let mut inner = self.inner.lock();
        inner.next_object_id = inner.next_object_id.max(object.id);
        inner.objects.insert(object.id, object);
    }

    /// Token the fake issues for `user_id`
    pub fn token_for(&self, user_id: i64) -> String {
        token_for(user_id)
    }

    /// Make the next call fail with `error`
    pub fn fail_next(&self, error: ApiError) {
        self.inner.lock().fail_next = Some(error);
    }

    /// Snapshot of a stored object
    pub fn object(&self, id: i64) -> Option<LostFoundObject> {
        self.inner.lock().objects.get(&id).cloned()
    }

    /// Number of remote calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.lock().fail_next.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn caller(inner: &Inner) -> Result<User> {
        let token = inner
            .token
            .as_deref()
            .ok_or_else(|| ApiError::application(401, "Unauthenticated."))?;

        inner
            .users
            .iter()
            .map(|(user, _)| user)
            .find(|user| token_for(user.id) == token)
            .cloned()
            .ok_or_else(|| ApiError::application(401, "Unauthenticated."))
    }

    fn owned_by(inner: &Inner, id: i64, caller: &User) -> Result<()> {
        let object = inner.objects.get(&id).ok_or_else(|| Self::not_found(id))?;
        if object.user_id != caller.id {
            return Err(ApiError::application(403, "Forbidden"));
        }
        Ok(())
    }

    fn not_found(id: i64) -> ApiError {
        ApiError::application(404, format!("Data dengan id {id} tidak ditemukan"))
    }
}

/// Build a record the way the server would return it
pub fn object(id: i64, user_id: i64, title: &str, description: &str, status: ObjectStatus) -> LostFoundObject {
    LostFoundObject {
        id,
        user_id,
        title: title.to_string(),
        description: description.to_string(),
        status,
        is_completed: false,
        cover: None,
        created_at: Some("2024-04-01 10:00:00".to_string()),
        updated_at: Some("2024-04-01 10:00:00".to_string()),
        author: None,
    }
}

#[async_trait]
impl LostFoundApi for InMemoryApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginData> {
        self.begin()?;
        let inner = self.inner.lock();
        inner
            .users
            .iter()
            .find(|(user, pw)| user.email == email && pw == password)
            .map(|(user, _)| LoginData { token: token_for(user.id), user: Some(user.clone()) })
            .ok_or_else(|| ApiError::application(401, "Email atau password salah"))
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<Ack> {
        self.begin()?;
        if self.inner.lock().users.iter().any(|(user, _)| user.email == email) {
            return Err(ApiError::application(400, "Email sudah terdaftar"));
        }
        self.add_user(name, email, password);
        Ok(Ack { message: "Berhasil mendaftar".to_string() })
    }

    async fn me(&self) -> Result<User> {
        self.begin()?;
        Self::caller(&self.inner.lock())
    }

    async fn list_objects(&self, filter: &ObjectFilter) -> Result<Vec<LostFoundObject>> {
        self.begin()?;
        let inner = self.inner.lock();
        let caller = Self::caller(&inner)?;
        Ok(inner
            .objects
            .values()
            .filter(|o| filter.matches(o, Some(caller.id)))
            .cloned()
            .collect())
    }

    async fn get_object(&self, id: i64) -> Result<LostFoundObject> {
        self.begin()?;
        let inner = self.inner.lock();
        Self::caller(&inner)?;
        inner.objects.get(&id).cloned().ok_or_else(|| Self::not_found(id))
    }

    async fn create_object(
        &self,
        title: &str,
        description: &str,
        status: ObjectStatus,
    ) -> Result<i64> {
        self.begin()?;
        let caller = Self::caller(&self.inner.lock())?;
        Ok(self.add_object(caller.id, title, description, status))
    }

    async fn update_object(
        &self,
        id: i64,
        title: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<Ack> {
        self.begin()?;
        let mut inner = self.inner.lock();
        let caller = Self::caller(&inner)?;
        Self::owned_by(&inner, id, &caller)?;
        let object = inner.objects.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        object.title = title.to_string();
        object.description = description.to_string();
        object.is_completed = is_completed;
        Ok(Ack { message: "Berhasil mengubah data".to_string() })
    }

    async fn delete_object(&self, id: i64) -> Result<Ack> {
        self.begin()?;
        let mut inner = self.inner.lock();
        let caller = Self::caller(&inner)?;
        Self::owned_by(&inner, id, &caller)?;
        inner.objects.remove(&id).ok_or_else(|| Self::not_found(id))?;
        Ok(Ack { message: "Berhasil menghapus data".to_string() })
    }

    fn set_token(&self, token: Option<String>) {
        self.inner.lock().token = token;
    }
}
