//! Screen controllers for the lost & found client
//!
//! Each screen turns user actions into repository invocations and drives a
//! [`View`] from the resulting notifications.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod detail;
pub mod editor;
pub mod home;
pub mod profiles;
pub mod validation;
pub mod view;

pub use auth::{LoginScreen, RegisterScreen};
pub use detail::ObjectDetailScreen;
pub use editor::{ManageMode, ObjectManageScreen};
pub use home::MainScreen;
pub use profiles::ProfileScreen;
pub use validation::ValidationError;
pub use view::{Route, ScreenResult, View};
