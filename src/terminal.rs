//! Terminal front end for the screens

use std::io::{self, BufRead, Write};

use app_core::{Route, ScreenResult, View};
use lostfound_client::{LostFoundObject, User};

/// Prints to stdout/stderr and asks questions on stdin
#[derive(Debug, Default)]
pub struct TerminalView {
    assume_yes: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every confirmation with yes
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }
}

fn check(done: bool) -> char {
    if done {
        'x'
    } else {
        ' '
    }
}

impl View for TerminalView {
    fn show_loading(&mut self, visible: bool) {
        if visible {
            eprint!("Loading...\r");
        } else {
            eprint!("          \r");
        }
        let _ = io::stderr().flush();
    }

    fn show_content(&mut self, _visible: bool) {}

    fn render_objects(&mut self, objects: &[LostFoundObject]) {
        if objects.is_empty() {
            println!("No objects.");
            return;
        }
        for object in objects {
            println!(
                "{:>5}  [{}]  {:<5}  {}",
                object.id,
                check(object.is_completed),
                object.status,
                object.title
            );
        }
    }

    fn render_object(&mut self, object: &LostFoundObject) {
        println!("#{} {}", object.id, object.title);
        println!("  status:    {}", object.status);
        println!("  completed: {}", if object.is_completed { "yes" } else { "no" });
        if let Some(created) = &object.created_at {
            println!("  created:   {created}");
        }
        if let Some(author) = &object.author {
            println!("  by:        {}", author.name);
        }
        if let Some(cover) = &object.cover {
            println!("  cover:     {cover}");
        }
        println!();
        println!("{}", object.description);
    }

    fn render_profile(&mut self, user: &User) {
        println!("{} <{}> (id {})", user.name, user.email, user.id);
    }

    fn toast(&mut self, message: &str) {
        println!("{message}");
    }

    fn alert(&mut self, title: &str, message: &str) {
        eprintln!("{title} {message}");
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{title}: {message} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(err) => {
                tracing::warn!(error = %err, "could not read answer");
                false
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        match route {
            Route::Login => eprintln!("Not logged in. Run `lost-found login` first."),
            other => tracing::debug!(?other, "navigation requested"),
        }
    }

    fn finish(&mut self, result: ScreenResult) {
        tracing::debug!(changed = result.changed, "screen finished");
    }
}
