//! Login and registration screens

use app_state::{AppServices, Notification};
use lostfound_client::Session;

use crate::validation::require;
use crate::view::{present, Route, ScreenResult, View};

const FAILED_TITLE: &str = "Oh no!";

/// Email/password login form
pub struct LoginScreen<V> {
    services: AppServices,
    view: V,
}

impl<V: View> LoginScreen<V> {
    /// Create the screen
    pub fn new(services: AppServices, view: V) -> Self {
        Self { services, view }
    }

    /// Front end
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Give the front end back
    pub fn into_view(self) -> V {
        self.view
    }

    /// Submit the form
    ///
    /// On success the session has been persisted and the screen finishes.
    /// On failure an alert is shown and nothing is stored.
    pub async fn submit(&mut self, email: &str, password: &str) -> Option<Session> {
        if let Err(err) = require(&[("Email", email), ("Password", password)]) {
            self.view.alert(FAILED_TITLE, &err.to_string());
            return None;
        }

        let invocation = self.services.auth().login(email, password);
        match present(&mut self.view, invocation).await {
            Notification::Success(session) => {
                self.view.navigate(Route::Main);
                self.view.finish(ScreenResult::changed());
                Some(session)
            }
            Notification::Error(message) => {
                self.view.alert(FAILED_TITLE, &message);
                self.view.show_content(true);
                None
            }
            Notification::Loading => None,
        }
    }

    /// Switch to the registration form
    pub fn open_register(&mut self) {
        self.view.navigate(Route::Register);
    }
}

/// Account creation form
pub struct RegisterScreen<V> {
    services: AppServices,
    view: V,
}

impl<V: View> RegisterScreen<V> {
    /// Create the screen
    pub fn new(services: AppServices, view: V) -> Self {
        Self { services, view }
    }

    /// Front end
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Submit the form; returns whether the account was created
    pub async fn submit(&mut self, name: &str, email: &str, password: &str) -> bool {
        if let Err(err) = require(&[("Name", name), ("Email", email), ("Password", password)]) {
            self.view.alert(FAILED_TITLE, &err.to_string());
            return false;
        }

        let invocation = self.services.auth().register(name, email, password);
        match present(&mut self.view, invocation).await {
            Notification::Success(ack) => {
                self.view.toast(&ack.message);
                self.view.navigate(Route::Login);
                self.view.finish(ScreenResult::changed());
                true
            }
            Notification::Error(message) => {
                self.view.alert(FAILED_TITLE, &message);
                self.view.show_content(true);
                false
            }
            Notification::Loading => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::testing::RecordingView;
    use lostfound_client::session::MemorySessionStore;
    use lostfound_client::test_utils::InMemoryApi;
    use std::sync::Arc;

    async fn setup() -> (Arc<InMemoryApi>, Arc<MemorySessionStore>, AppServices) {
        let api = Arc::new(InMemoryApi::new());
        api.add_user("Alice", "a@b.com", "secret");
        let store = Arc::new(MemorySessionStore::new());
        let services = AppServices::bootstrap(api.clone(), store.clone()).await.unwrap();
        (api, store, services)
    }

    #[tokio::test]
    async fn test_login_success_finishes() {
        let (_api, store, services) = setup().await;
        let mut screen = LoginScreen::new(services, RecordingView::new());

        let session = screen.submit("a@b.com", "secret").await;

        assert!(session.is_some_and(|s| s.is_authenticated()));
        assert_eq!(screen.view().finished(), vec![ScreenResult::changed()]);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_login_failure_alerts_once() {
        let (_api, store, services) = setup().await;
        let mut screen = LoginScreen::new(services, RecordingView::new());

        assert!(screen.submit("a@b.com", "wrong").await.is_none());

        let view = screen.into_view();
        assert_eq!(view.alerts(), vec!["Email atau password salah"]);
        assert!(view.finished().is_empty());
        assert_eq!(view.last_content(), Some(true));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_login_empty_field_makes_no_call() {
        let (api, _store, services) = setup().await;
        let mut screen = LoginScreen::new(services, RecordingView::new());

        assert!(screen.submit("", "secret").await.is_none());

        assert_eq!(api.call_count(), 0);
        assert_eq!(screen.view().alerts(), vec!["Email must not be empty"]);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (_api, _store, services) = setup().await;

        let mut register = RegisterScreen::new(services.clone(), RecordingView::new());
        assert!(register.submit("Bob", "bob@b.com", "pw").await);
        assert_eq!(register.view().toasts(), vec!["Berhasil mendaftar"]);

        let mut login = LoginScreen::new(services, RecordingView::new());
        assert!(login.submit("bob@b.com", "pw").await.is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_alerts() {
        let (_api, _store, services) = setup().await;
        let mut screen = RegisterScreen::new(services, RecordingView::new());

        assert!(!screen.submit("Alice", "a@b.com", "x").await);
        assert_eq!(screen.view().alerts(), vec!["Email sudah terdaftar"]);
    }
}
