//! Operation state for the lost & found client
//!
//! This crate turns API calls into Loading/Success/Error notification
//! sequences, provides the single-observation subscriber that consumes
//! them, and wires the repositories together.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod invocation;
pub mod notification;
pub mod observe;
pub mod repository;
pub mod services;

pub use invocation::{Invocation, NotificationCell, NotificationReceiver, NotificationSource, Replay};
pub use notification::{Notification, OperationError};
pub use observe::{observe_once, ObserveOnce, ObserverState};
pub use repository::{AuthRepository, ObjectRepository, UserRepository};
pub use services::AppServices;
