//! Profile screen

use app_state::{AppServices, Notification};
use lostfound_client::User;

use crate::view::{present, Route, ScreenResult, View};

/// Profile of the signed-in user
pub struct ProfileScreen<V> {
    services: AppServices,
    view: V,
    user: Option<User>,
}

impl<V: View> ProfileScreen<V> {
    /// Create the screen
    pub fn new(services: AppServices, view: V) -> Self {
        Self { services, view, user: None }
    }

    /// Front end
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Loaded profile
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Fetch and render the profile
    pub async fn open(&mut self) -> bool {
        let invocation = self.services.users().me();
        match present(&mut self.view, invocation).await {
            Notification::Success(user) => {
                self.view.render_profile(&user);
                self.view.show_content(true);
                self.user = Some(user);
                true
            }
            Notification::Error(message) => {
                self.view.toast(&message);
                false
            }
            Notification::Loading => false,
        }
    }

    /// Forget the session and go to the login form
    pub async fn logout(&mut self) {
        match self.services.auth().logout().outcome().await {
            Notification::Success(()) => {
                self.user = None;
                self.view.navigate(Route::Login);
                self.view.finish(ScreenResult::unchanged());
            }
            Notification::Error(message) => self.view.toast(&message),
            Notification::Loading => {}
        }
    }
}
