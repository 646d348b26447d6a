//! Loading / Success / Error notifications
//!
//! Every repository operation reports its progress as a short sequence of
//! [`Notification`]s: an optional `Loading`, then exactly one terminal
//! `Success` or `Error`.

use lostfound_client::http::{ApiError, GENERIC_ERROR_MESSAGE};
use lostfound_client::session::SessionStoreError;
use thiserror::Error;

/// Faults an operation can end with
#[derive(Debug, Error)]
pub enum OperationError {
    /// Remote call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session store failed
    #[error("Session error: {0}")]
    Session(#[from] SessionStoreError),
}

impl OperationError {
    /// Text suitable for a toast or dialog
    pub fn display_message(&self) -> String {
        let text = match self {
            Self::Api(err) => return err.display_message(),
            Self::Session(err) => err.to_string(),
        };
        if text.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            text
        }
    }
}

/// Result type for repository operations
pub type Result<T> = std::result::Result<T, OperationError>;

/// One step of an operation's progress
///
/// # Examples
/// ```
/// use app_state::notification::Notification;
///
/// let done: Notification<u32> = Notification::Success(3);
/// assert!(done.is_terminal());
/// assert_eq!(done.map(|n| n * 2), Notification::Success(6));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<T> {
    /// The operation has started
    Loading,
    /// The operation finished with a payload
    Success(T),
    /// The operation failed; carries a display-ready message
    Error(String),
}

impl<T> Notification<T> {
    /// Whether this is `Loading`
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Whether this ends the sequence (`Success` or `Error`)
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    /// Transform the success payload
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Notification<U> {
        match self {
            Self::Loading => Notification::Loading,
            Self::Success(data) => Notification::Success(f(data)),
            Self::Error(message) => Notification::Error(message),
        }
    }

    /// Success payload, if any
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Error message, if any
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> From<Result<T>> for Notification<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err) => {
                tracing::debug!(error = %err, "operation failed");
                Self::Error(err.display_message())
            }
        }
    }
}
