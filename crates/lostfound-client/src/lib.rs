//! Lost & Found API client
//!
//! This crate provides the typed REST client for the lost & found listing
//! service, its record types, and the persisted login session.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod http;
pub mod models;
pub mod session;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use api::{DelcomApiClient, LostFoundApi};
pub use http::{ApiError, ClientConfig, GENERIC_ERROR_MESSAGE};
pub use models::{Ack, LoginData, LostFoundObject, ObjectFilter, ObjectStatus, User};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_types() {
        let err = ApiError::InvalidInput("test".to_string());
        assert!(err.to_string().contains("Invalid input"));
    }
}
