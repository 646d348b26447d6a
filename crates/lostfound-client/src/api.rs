//! Typed operations of the lost & found REST API
//!
//! [`LostFoundApi`] is the seam the repositories depend on;
//! [`DelcomApiClient`] is its HTTP implementation.
//!
//! # Example
//!
//! ```rust,no_run
//! use lostfound_client::{ClientConfig, DelcomApiClient, LostFoundApi, ObjectFilter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DelcomApiClient::new(ClientConfig::default())?;
//!     let login = client.login("alice@example.com", "secret").await?;
//!     client.set_token(Some(login.token));
//!
//!     for object in client.list_objects(&ObjectFilter::default()).await? {
//!         println!("{} [{}]", object.title, object.status);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

use crate::http::{ApiError, ApiRequest, ClientConfig, HttpClient};
use crate::models::{
    Ack, CreatedObject, LoginData, LostFoundObject, ObjectData, ObjectFilter, ObjectStatus,
    ObjectsData, User, UserData,
};
use crate::Result;

/// Remote operations the client needs
///
/// Every method performs exactly one request and either returns the decoded
/// payload or an [`ApiError`].
#[async_trait]
pub trait LostFoundApi: Send + Sync {
    /// Exchange credentials for a token
    async fn login(&self, email: &str, password: &str) -> Result<LoginData>;

    /// Create an account
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<Ack>;

    /// Profile of the authenticated user
    async fn me(&self) -> Result<User>;

    /// List objects, optionally filtered
    async fn list_objects(&self, filter: &ObjectFilter) -> Result<Vec<LostFoundObject>>;

    /// Fetch one object
    async fn get_object(&self, id: i64) -> Result<LostFoundObject>;

    /// Create an object; returns the server-assigned id
    async fn create_object(
        &self,
        title: &str,
        description: &str,
        status: ObjectStatus,
    ) -> Result<i64>;

    /// Replace an object's title, description and completion flag
    async fn update_object(
        &self,
        id: i64,
        title: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<Ack>;

    /// Delete an object
    async fn delete_object(&self, id: i64) -> Result<Ack>;

    /// Set or clear the bearer token used by subsequent calls
    fn set_token(&self, token: Option<String>);
}

/// HTTP implementation of [`LostFoundApi`]
#[derive(Debug, Clone)]
pub struct DelcomApiClient {
    http: HttpClient,
}

impl DelcomApiClient {
    /// Create a client without a token
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self { http: HttpClient::new(config)? })
    }

    /// Create a client that authenticates with `token`
    pub fn with_token(config: ClientConfig, token: Option<String>) -> Result<Self> {
        let client = Self::new(config)?;
        client.http.set_token(token);
        Ok(client)
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    fn object_path(id: i64) -> Result<String> {
        if id <= 0 {
            return Err(ApiError::InvalidInput(format!("invalid object id {id}")));
        }
        Ok(format!("/lost-founds/{id}"))
    }

    async fn ack(&self, request: ApiRequest) -> Result<Ack> {
        let envelope = self.http.send::<serde_json::Value>(request).await?;
        Ok(Ack { message: envelope.message })
    }
}

#[async_trait]
impl LostFoundApi for DelcomApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginData> {
        tracing::debug!(email, "logging in");
        let request = ApiRequest::post("/auth/login")
            .field("email", email)
            .field("password", password)
            .anonymous();

        self.http.send::<LoginData>(request).await?.into_data()
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<Ack> {
        tracing::debug!(email, "registering account");
        let request = ApiRequest::post("/auth/register")
            .field("name", name)
            .field("email", email)
            .field("password", password)
            .anonymous();

        self.ack(request).await
    }

    async fn me(&self) -> Result<User> {
        let data: UserData = self.http.send(ApiRequest::get("/users/me")).await?.into_data()?;
        Ok(data.user)
    }

    async fn list_objects(&self, filter: &ObjectFilter) -> Result<Vec<LostFoundObject>> {
        let mut request = ApiRequest::get("/lost-founds");
        for (key, value) in filter.to_params() {
            request = request.param(key, value);
        }

        let data: ObjectsData = self.http.send(request).await?.into_data()?;
        tracing::debug!(count = data.lost_founds.len(), "listed objects");
        Ok(data.lost_founds)
    }

    async fn get_object(&self, id: i64) -> Result<LostFoundObject> {
        let request = ApiRequest::get(Self::object_path(id)?);
        let data: ObjectData = self.http.send(request).await?.into_data()?;
        Ok(data.lost_found)
    }

    async fn create_object(
        &self,
        title: &str,
        description: &str,
        status: ObjectStatus,
    ) -> Result<i64> {
        let request = ApiRequest::post("/lost-founds")
            .field("title", title)
            .field("description", description)
            .field("status", status.as_str());

        let data: CreatedObject = self.http.send(request).await?.into_data()?;
        tracing::info!(id = data.lost_found_id, "created object");
        Ok(data.lost_found_id)
    }

    async fn update_object(
        &self,
        id: i64,
        title: &str,
        description: &str,
        is_completed: bool,
    ) -> Result<Ack> {
        let request = ApiRequest::put(Self::object_path(id)?)
            .field("title", title)
            .field("description", description)
            .field("is_completed", u8::from(is_completed).to_string());

        let ack = self.ack(request).await?;
        tracing::info!(id, is_completed, "updated object");
        Ok(ack)
    }

    async fn delete_object(&self, id: i64) -> Result<Ack> {
        let ack = self.ack(ApiRequest::delete(Self::object_path(id)?)).await?;
        tracing::info!(id, "deleted object");
        Ok(ack)
    }

    fn set_token(&self, token: Option<String>) {
        self.http.set_token(token);
    }
}
