//! Create / edit form
//!
//! In add mode the form collects a title, a description and a status. In
//! edit mode it replaces the title and description and keeps the object's
//! completion flag. Empty fields are rejected before anything is sent.

use app_state::{AppServices, Notification};
use lostfound_client::{LostFoundObject, ObjectStatus};

use crate::validation::require;
use crate::view::{present, ScreenResult, View};

const FAILED_TITLE: &str = "Oh no!";

/// What the form is doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageMode {
    /// Create a new object
    Add,
    /// Change an existing object
    Edit(LostFoundObject),
}

/// Create / edit form
pub struct ObjectManageScreen<V> {
    services: AppServices,
    view: V,
    mode: ManageMode,
}

impl<V: View> ObjectManageScreen<V> {
    /// Form for a new object
    pub fn add(services: AppServices, view: V) -> Self {
        Self { services, view, mode: ManageMode::Add }
    }

    /// Form pre-filled with `object`
    pub fn edit(services: AppServices, view: V, object: LostFoundObject) -> Self {
        Self { services, view, mode: ManageMode::Edit(object) }
    }

    /// Front end
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Current mode
    pub fn mode(&self) -> &ManageMode {
        &self.mode
    }

    /// Title shown in the app bar
    pub fn heading(&self) -> &'static str {
        match self.mode {
            ManageMode::Add => "Add object",
            ManageMode::Edit(_) => "Edit object",
        }
    }

    /// Save the form
    ///
    /// `status` is only used in add mode. Returns whether the server
    /// accepted the change; the screen has then finished with `changed`.
    pub async fn save(&mut self, title: &str, description: &str, status: ObjectStatus) -> bool {
        if let Err(err) = require(&[("Title", title), ("Description", description)]) {
            self.view.alert(FAILED_TITLE, &err.to_string());
            return false;
        }

        let outcome = match &self.mode {
            ManageMode::Add => {
                let invocation = self.services.objects().create(title, description, status);
                present(&mut self.view, invocation).await.map(|_| ())
            }
            ManageMode::Edit(object) => {
                let invocation = self.services.objects().update(
                    object.id,
                    title,
                    description,
                    object.is_completed,
                );
                present(&mut self.view, invocation).await.map(|_| ())
            }
        };

        match outcome {
            Notification::Success(()) => {
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

    /// Leave without saving
    pub fn cancel(&mut self) -> ScreenResult {
        self.view.finish(ScreenResult::unchanged());
        ScreenResult::unchanged()
    }
}
