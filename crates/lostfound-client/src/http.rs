//! HTTP transport for the lost & found REST API
//!
//! This module holds the request/response types, the error taxonomy and the
//! reqwest-backed client every endpoint goes through. Requests are sent
//! exactly once; nothing here retries.

use parking_lot::RwLock;
use reqwest::{Client as ReqwestClient, Response as ReqwestResponse};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Message shown when a fault carries no text of its own
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Default API root of the hosted service
pub const DEFAULT_BASE_URL: &str = "https://public-api.delcom.org/api/v1";

// =============================================================================
// Error Types
// =============================================================================

/// Faults raised by the API client
///
/// Three families reach the UI: the request never completed
/// ([`ApiError::Transport`]), the body could not be understood
/// ([`ApiError::Decode`]), or the server rejected the request
/// ([`ApiError::Application`]).
///
/// # Examples
/// ```
/// use lostfound_client::http::ApiError;
///
/// let error = ApiError::application(401, "Email atau password salah");
/// assert_eq!(error.status(), Some(401));
/// assert!(error.is_unauthorized());
/// assert_eq!(error.display_message(), "Email atau password salah");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Connectivity failure or timeout
    #[error("Network error: {0}")]
    Transport(String),

    /// Response body had an unexpected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// Error reported by the server
    #[error("API error ({status}): {message}")]
    Application {
        /// HTTP status code
        status: u16,
        /// Message from the server's envelope
        message: String,
    },

    /// Request could not be built from the given input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Create an application error
    pub fn application(status: u16, message: impl Into<String>) -> Self {
        Self::Application { status, message: message.into() }
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request never reached a response
    pub fn is_network_error(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Whether the server refused the credentials or token
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Text suitable for a toast or dialog
    ///
    /// Application errors show the server's message verbatim; other faults
    /// show their own description. Blank messages fall back to
    /// [`GENERIC_ERROR_MESSAGE`].
    pub fn display_message(&self) -> String {
        let text = match self {
            Self::Application { message, .. } => message.trim().to_string(),
            Self::Transport(msg) | Self::Decode(msg) | Self::InvalidInput(msg) => {
                if msg.trim().is_empty() {
                    String::new()
                } else {
                    self.to_string()
                }
            }
        };

        if text.is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            text
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// HTTP method for API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request (reads)
    Get,
    /// POST request (creates, login)
    Post,
    /// PUT request (updates)
    Put,
    /// DELETE request
    Delete,
}

impl HttpMethod {
    /// Method name as sent on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A request to one REST endpoint
///
/// Bodies are form-encoded, which is what the service accepts for every
/// write.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Path below the base URL (e.g., "/lost-founds/5")
    pub path: String,
    /// Query parameters, in insertion order
    pub params: Vec<(String, String)>,
    /// Form fields for the body
    pub form: Vec<(String, String)>,
    /// Whether the bearer token should be attached
    pub authenticated: bool,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            form: Vec::new(),
            authenticated: true,
        }
    }

    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Create a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Create a PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Create a DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add a form field
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form.push((key.into(), value.into()));
        self
    }

    /// Send without the bearer token (login, register)
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// Envelope every endpoint wraps its payload in
///
/// ```json
/// { "success": true, "message": "...", "data": { ... } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Whether the server considers the call successful
    #[serde(default)]
    pub success: bool,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Payload, absent on acknowledgements and failures
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Take the payload, treating its absence as a decode fault
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::Decode("response is missing the data field".to_string()))
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root (e.g., "https://public-api.delcom.org/api/v1")
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Headers sent with every request
    pub default_headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("lost-found/{}", env!("CARGO_PKG_VERSION")),
            default_headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new config with a base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add a default header
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Join the base URL and an endpoint path
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// =============================================================================
// HTTP Client
// =============================================================================

/// reqwest-backed client shared by every endpoint
///
/// The bearer token is held behind a lock so login and logout can swap it
/// without rebuilding the client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    config: ClientConfig,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::InvalidInput(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config, token: Arc::new(RwLock::new(None)) })
    }

    /// Set or clear the bearer token
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write() = token.filter(|t| !t.is_empty());
    }

    /// Current bearer token
    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and decode its envelope
    ///
    /// Non-2xx statuses and `success: false` envelopes become
    /// [`ApiError::Application`] carrying the server's message.
    pub async fn send<T>(&self, request: ApiRequest) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.config.url_for(&request.path);
        tracing::debug!(method = request.method.as_str(), %url, "sending request");

        let mut req = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        if !request.params.is_empty() {
            req = req.query(&request.params);
        }

        for (key, value) in &self.config.default_headers {
            req = req.header(key, value);
        }

        if request.authenticated {
            if let Some(token) = self.token() {
                req = req.bearer_auth(token);
            }
        }

        if !request.form.is_empty() {
            req = req.form(&request.form);
        }

        let response = req.send().await.map_err(|e| {
            tracing::warn!(%url, error = %e, "request failed");
            ApiError::from(e)
        })?;

        self.parse_response(response).await
    }

    async fn parse_response<T>(&self, response: ReqwestResponse) -> Result<Envelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
                Ok(envelope) if !envelope.message.trim().is_empty() => envelope.message,
                _ if body.trim().is_empty() => format!("HTTP {}", status.as_u16()),
                _ => format!("HTTP {}: {}", status.as_u16(), body.trim()),
            };
            tracing::debug!(status = status.as_u16(), %message, "server rejected request");
            return Err(ApiError::application(status.as_u16(), message));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(ApiError::application(status.as_u16(), envelope.message));
        }

        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_message() {
        let error = ApiError::application(400, "Judul tidak boleh kosong");
        assert_eq!(error.status(), Some(400));
        assert!(!error.is_network_error());
        assert!(!error.is_unauthorized());
        assert_eq!(error.display_message(), "Judul tidak boleh kosong");
    }

    #[test]
    fn test_blank_messages_fall_back() {
        assert_eq!(ApiError::application(500, "  ").display_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(ApiError::Transport(String::new()).display_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_transport_error_message() {
        let error = ApiError::Transport("connection refused".to_string());
        assert!(error.is_network_error());
        assert_eq!(error.status(), None);
        assert!(error.display_message().contains("connection refused"));
    }

    #[test]
    fn test_request_builder() {
        let req = ApiRequest::post("/auth/login")
            .field("email", "a@b.com")
            .field("password", "secret")
            .anonymous();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/auth/login");
        assert_eq!(req.form[0], ("email".to_string(), "a@b.com".to_string()));
        assert!(!req.authenticated);
    }

    #[test]
    fn test_request_params_keep_order() {
        let req = ApiRequest::get("/lost-founds").param("is_me", "1").param("status", "lost");
        assert_eq!(req.params[0].0, "is_me");
        assert_eq!(req.params[1].0, "status");
        assert!(req.authenticated);
    }

    #[test]
    fn test_envelope_without_data() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"success":true,"message":"ok"}"#).unwrap();
        assert!(envelope.success);
        assert!(envelope.data.is_none());
        assert!(matches!(envelope.into_data(), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_url_for_joins_slashes() {
        let config = ClientConfig::new("https://api.example.com/v1/");
        assert_eq!(config.url_for("/lost-founds/5"), "https://api.example.com/v1/lost-founds/5");
        assert_eq!(config.url_for("users/me"), "https://api.example.com/v1/users/me");
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new("https://custom.server")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("Tester/1.0")
            .with_header("X-Custom", "value");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "Tester/1.0");
        assert_eq!(config.default_headers.get("X-Custom"), Some(&"value".to_string()));
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.user_agent.starts_with("lost-found/"));
    }

    #[test]
    fn test_token_swap() {
        let client = HttpClient::new(ClientConfig::default()).unwrap();
        assert!(client.token().is_none());

        client.set_token(Some("abc".to_string()));
        assert_eq!(client.token(), Some("abc".to_string()));

        client.set_token(Some(String::new()));
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn test_reqwest_failure_maps_to_transport() {
        let err = reqwest::Client::new().get("not a url").send().await.unwrap_err();
        assert!(!err.is_decode());

        let error = ApiError::from(err);
        assert!(matches!(error, ApiError::Transport(_)));
        assert!(error.is_network_error());
    }
}
