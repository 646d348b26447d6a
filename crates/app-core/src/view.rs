//! Presentation seam shared by every screen
//!
//! Screens never draw anything themselves; they drive a [`View`]. The
//! terminal front end implements it for real, tests implement it with a
//! recorder.

use app_state::{observe_once, Invocation, Notification};
use lostfound_client::{LostFoundObject, User, GENERIC_ERROR_MESSAGE};

/// Where a screen asks to go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Login form
    Login,
    /// Registration form
    Register,
    /// Object list
    Main,
    /// Detail of one object
    Detail(i64),
    /// Create form
    Add,
    /// Edit form for an existing object
    Edit(LostFoundObject),
    /// Profile of the signed-in user
    Profile,
}

/// Value a screen returns to whoever opened it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenResult {
    /// Whether the caller should reload its data
    pub changed: bool,
}

impl ScreenResult {
    /// Result that asks the caller to reload
    pub fn changed() -> Self {
        Self { changed: true }
    }

    /// Result that leaves the caller as is
    pub fn unchanged() -> Self {
        Self { changed: false }
    }
}

/// What a screen can ask of its front end
pub trait View {
    /// Show or hide the busy indicator
    fn show_loading(&mut self, visible: bool);

    /// Show or hide the main content
    fn show_content(&mut self, visible: bool);

    /// Render a list of objects
    fn render_objects(&mut self, _objects: &[LostFoundObject]) {}

    /// Render one object
    fn render_object(&mut self, _object: &LostFoundObject) {}

    /// Render a profile
    fn render_profile(&mut self, _user: &User) {}

    /// Short, non-blocking message
    fn toast(&mut self, message: &str);

    /// Blocking dialog
    fn alert(&mut self, title: &str, message: &str);

    /// Ask a yes/no question
    fn confirm(&mut self, _title: &str, _message: &str) -> bool {
        true
    }

    /// Open another screen
    fn navigate(&mut self, _route: Route) {}

    /// Close this screen
    fn finish(&mut self, result: ScreenResult);
}

/// Observe `invocation` once, toggling the busy indicator, and return its
/// terminal notification
pub(crate) async fn present<T, V>(view: &mut V, mut invocation: Invocation<T>) -> Notification<T>
where
    T: Send,
    V: View + ?Sized,
{
    let mut terminal = None;
    observe_once(&mut invocation, |notification| match notification {
        Notification::Loading => {
            view.show_content(false);
            view.show_loading(true);
        }
        done => {
            view.show_loading(false);
            terminal = Some(done);
        }
    })
    .await;

    terminal.unwrap_or_else(|| Notification::Error(GENERIC_ERROR_MESSAGE.to_string()))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording view for screen tests

    use super::*;

    /// One call made on the view
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Loading(bool),
        Content(bool),
        Objects(Vec<i64>),
        Object(i64),
        Profile(String),
        Toast(String),
        Alert(String, String),
        Confirm(String),
        Navigate(Route),
        Finish(ScreenResult),
    }

    #[derive(Debug, Default)]
    pub struct RecordingView {
        pub events: Vec<Event>,
        pub answer: bool,
    }

    impl RecordingView {
        pub fn new() -> Self {
            Self { events: Vec::new(), answer: true }
        }

        pub fn declining() -> Self {
            Self { events: Vec::new(), answer: false }
        }

        pub fn finished(&self) -> Vec<ScreenResult> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Finish(result) => Some(*result),
                    _ => None,
                })
                .collect()
        }

        pub fn toasts(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Toast(message) => Some(message.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn alerts(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Alert(_, message) => Some(message.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn last_content(&self) -> Option<bool> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Content(visible) => Some(*visible),
                _ => None,
            })
        }

        pub fn last_loading(&self) -> Option<bool> {
            self.events.iter().rev().find_map(|e| match e {
                Event::Loading(visible) => Some(*visible),
                _ => None,
            })
        }
    }

    impl View for RecordingView {
        fn show_loading(&mut self, visible: bool) {
            self.events.push(Event::Loading(visible));
        }

        fn show_content(&mut self, visible: bool) {
            self.events.push(Event::Content(visible));
        }

        fn render_objects(&mut self, objects: &[LostFoundObject]) {
            self.events.push(Event::Objects(objects.iter().map(|o| o.id).collect()));
        }

        fn render_object(&mut self, object: &LostFoundObject) {
            self.events.push(Event::Object(object.id));
        }

        fn render_profile(&mut self, user: &User) {
            self.events.push(Event::Profile(user.name.clone()));
        }

        fn toast(&mut self, message: &str) {
            self.events.push(Event::Toast(message.to_string()));
        }

        fn alert(&mut self, title: &str, message: &str) {
            self.events.push(Event::Alert(title.to_string(), message.to_string()));
        }

        fn confirm(&mut self, title: &str, _message: &str) -> bool {
            self.events.push(Event::Confirm(title.to_string()));
            self.answer
        }

        fn navigate(&mut self, route: Route) {
            self.events.push(Event::Navigate(route));
        }

        fn finish(&mut self, result: ScreenResult) {
            self.events.push(Event::Finish(result));
        }
    }
}
