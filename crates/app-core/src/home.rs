//! Object list screen
//!
//! The home screen needs a logged-in session. It lists objects under an
//! optional filter, lets the user tick objects off inline, and reloads
//! whenever a child screen reports a change.

use app_state::{AppServices, Notification};
use lostfound_client::{LostFoundObject, ObjectFilter};

use crate::view::{present, Route, ScreenResult, View};

/// Object list
pub struct MainScreen<V> {
    services: AppServices,
    view: V,
    filter: ObjectFilter,
    objects: Vec<LostFoundObject>,
}

impl<V: View> MainScreen<V> {
    /// Create the screen with no filter
    pub fn new(services: AppServices, view: V) -> Self {
        Self { services, view, filter: ObjectFilter::default(), objects: Vec::new() }
    }

    /// Start with `filter` instead of the empty one
    pub fn with_filter(mut self, filter: ObjectFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Front end
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Objects from the last successful load
    pub fn objects(&self) -> &[LostFoundObject] {
        &self.objects
    }

    /// Active filter
    pub fn filter(&self) -> ObjectFilter {
        self.filter
    }

    /// Check the session and load the list
    ///
    /// Without a session the screen sends the user to the login form and
    /// returns `false`.
    pub async fn open(&mut self) -> bool {
        let session = match self.services.auth().session().outcome().await {
            Notification::Success(session) => session,
            Notification::Error(message) => {
                tracing::warn!(%message, "could not read session");
                self.view.toast(&message);
                Default::default()
            }
            Notification::Loading => Default::default(),
        };

        if !session.is_authenticated() {
            self.view.navigate(Route::Login);
            self.view.finish(ScreenResult::unchanged());
            return false;
        }

        self.load().await;
        true
    }

    /// Replace the filter and reload
    pub async fn set_filter(&mut self, filter: ObjectFilter) -> bool {
        self.filter = filter;
        self.load().await
    }

    /// Fetch the list under the active filter
    pub async fn load(&mut self) -> bool {
        let invocation = self.services.objects().list(self.filter);
        match present(&mut self.view, invocation).await {
            Notification::Success(objects) => {
                self.view.render_objects(&objects);
                self.view.show_content(true);
                self.objects = objects;
                true
            }
            Notification::Error(message) => {
                self.view.toast(&message);
                self.view.show_content(true);
                false
            }
            Notification::Loading => false,
        }
    }

    /// Flip an object's completion flag, keeping its title and description
    pub async fn toggle_completed(&mut self, id: i64) -> bool {
        let Some(object) = self.objects.iter().find(|o| o.id == id).cloned() else {
            self.view.toast(&format!("Object {id} is not in the list"));
            return false;
        };
        let completed = !object.is_completed;

        let invocation =
            self.services.objects().update(object.id, &object.title, &object.description, completed);
        match invocation.outcome().await {
            Notification::Success(_) => {
                let verb = if completed { "Completed" } else { "Reopened" };
                self.view.toast(&format!("{verb}: {}", object.title));
                self.load().await
            }
            Notification::Error(message) => {
                self.view.toast(&format!("Could not update {}: {message}", object.title));
                false
            }
            Notification::Loading => false,
        }
    }

    /// Open the detail of an object
    pub fn open_detail(&mut self, id: i64) {
        self.view.navigate(Route::Detail(id));
    }

    /// Open the create form
    pub fn open_add(&mut self) {
        self.view.navigate(Route::Add);
    }

    /// Open the profile
    pub fn open_profile(&mut self) {
        self.view.navigate(Route::Profile);
    }

    /// A child screen closed; reload if it changed something
    pub async fn on_result(&mut self, result: ScreenResult) {
        if result.changed {
            self.load().await;
        }
    }

    /// Forget the session and go to the login form
    pub async fn logout(&mut self) {
        match self.services.auth().logout().outcome().await {
            Notification::Success(()) => {
                self.objects.clear();
                self.view.navigate(Route::Login);
                self.view.finish(ScreenResult::unchanged());
            }
            Notification::Error(message) => self.view.toast(&message),
            Notification::Loading => {}
        }
    }
}
