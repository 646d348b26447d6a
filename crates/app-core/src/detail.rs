//! Object detail screen

use app_state::{AppServices, Notification};
use lostfound_client::LostFoundObject;

use crate::view::{present, Route, ScreenResult, View};

/// Detail of one object, with completion toggle, edit and delete
pub struct ObjectDetailScreen<V> {
    services: AppServices,
    view: V,
    id: i64,
    object: Option<LostFoundObject>,
    loaded_completed: bool,
    changed: bool,
}

impl<V: View> ObjectDetailScreen<V> {
    /// Create the screen for object `id`
    pub fn new(services: AppServices, view: V, id: i64) -> Self {
        Self { services, view, id, object: None, loaded_completed: false, changed: false }
    }

    /// Front end
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Loaded object, if any
    pub fn object(&self) -> Option<&LostFoundObject> {
        self.object.as_ref()
    }

    /// Whether the caller will be told to reload
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Load the object; an id of zero closes the screen straight away
    pub async fn open(&mut self) -> bool {
        self.view.show_content(false);
        self.view.show_loading(false);

        if self.id == 0 {
            self.view.finish(ScreenResult::unchanged());
            return false;
        }
        self.load().await
    }

    async fn load(&mut self) -> bool {
        let invocation = self.services.objects().get(self.id);
        match present(&mut self.view, invocation).await {
            Notification::Success(object) => {
                self.view.render_object(&object);
                self.view.show_content(true);
                self.loaded_completed = object.is_completed;
                self.object = Some(object);
                true
            }
            Notification::Error(message) => {
                self.view.toast(&message);
                self.view.finish(ScreenResult::unchanged());
                false
            }
            Notification::Loading => false,
        }
    }

    /// Set the completion flag
    ///
    /// The screen only counts as changed when the new flag differs from the
    /// one the object was loaded with.
    pub async fn set_completed(&mut self, completed: bool) -> bool {
        let Some(object) = self.object.clone() else {
            return false;
        };

        let invocation =
            self.services.objects().update(object.id, &object.title, &object.description, completed);
        match invocation.outcome().await {
            Notification::Success(_) => {
                let verb = if completed { "Completed" } else { "Reopened" };
                self.view.toast(&format!("{verb}: {}", object.title));
                if let Some(current) = self.object.as_mut() {
                    current.is_completed = completed;
                }
                if self.loaded_completed != completed {
                    self.changed = true;
                }
                true
            }
            Notification::Error(message) => {
                let verb = if completed { "complete" } else { "reopen" };
                self.view.toast(&format!("Could not {verb} {}: {message}", object.title));
                false
            }
            Notification::Loading => false,
        }
    }

    /// Ask for confirmation, then delete
    ///
    /// On success the screen finishes with `changed`. On failure the content
    /// is shown again and the error is toasted.
    pub async fn delete(&mut self) -> bool {
        let Some(id) = self.object.as_ref().map(|o| o.id) else {
            return false;
        };
        if !self.view.confirm("Delete object", "Are you sure you want to delete this object?") {
            return false;
        }

        match present(&mut self.view, self.services.objects().delete(id)).await {
            Notification::Success(_) => {
                self.view.toast("Object deleted");
                self.changed = true;
                self.view.finish(ScreenResult::changed());
                true
            }
            Notification::Error(message) => {
                self.view.show_content(true);
                self.view.toast(&format!("Could not delete object: {message}"));
                false
            }
            Notification::Loading => false,
        }
    }

    /// Open the edit form for the loaded object
    pub fn edit(&mut self) {
        if let Some(object) = self.object.clone() {
            self.view.navigate(Route::Edit(object));
        }
    }

    /// The edit form closed; reload if it saved
    pub async fn on_result(&mut self, result: ScreenResult) {
        if result.changed {
            self.changed = true;
            self.load().await;
        }
    }

    /// Close the screen, reporting whether anything changed
    pub fn back(&mut self) -> ScreenResult {
        let result = ScreenResult { changed: self.changed };
        self.view.finish(result);
        result
    }
}
