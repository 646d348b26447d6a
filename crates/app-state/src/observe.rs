//! Single-observation subscriber
//!
//! [`ObserveOnce`] forwards every `Loading` to its reaction and stops for
//! good after the first terminal notification. A source that redelivers its
//! latest value (see [`crate::invocation::Replay`]) therefore cannot make a
//! success dialog or a "changed" flag fire twice.

use crate::invocation::NotificationSource;
use crate::notification::Notification;

/// Subscriber lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    /// Not yet attached to a source
    Idle,
    /// Attached; reacting to notifications
    Observing,
    /// Saw a terminal notification; ignores everything after
    Done,
}

/// Reacts to notifications until the first terminal one
pub struct ObserveOnce<T, F>
where
    F: FnMut(Notification<T>),
{
    state: ObserverState,
    reaction: F,
    _marker: std::marker::PhantomData<fn(T)>,
}

impl<T, F> ObserveOnce<T, F>
where
    F: FnMut(Notification<T>),
{
    /// New idle subscriber
    pub fn new(reaction: F) -> Self {
        Self { state: ObserverState::Idle, reaction, _marker: std::marker::PhantomData }
    }

    /// Current state
    pub fn state(&self) -> ObserverState {
        self.state
    }

    /// Attach to a source
    ///
    /// Has no effect once the subscriber is `Done`.
    pub fn subscribe(&mut self) {
        if self.state == ObserverState::Idle {
            self.state = ObserverState::Observing;
        }
    }

    /// Hand one notification to the subscriber
    ///
    /// Returns whether the reaction ran.
    pub fn deliver(&mut self, notification: Notification<T>) -> bool {
        match self.state {
            ObserverState::Idle => false,
            ObserverState::Done => {
                tracing::trace!("ignoring notification after terminal outcome");
                false
            }
            ObserverState::Observing => {
                let terminal = notification.is_terminal();
                (self.reaction)(notification);
                if terminal {
                    self.state = ObserverState::Done;
                }
                true
            }
        }
    }

    /// Subscribe and pump `source` until a terminal notification or until
    /// the source closes
    pub async fn observe<S>(&mut self, source: &mut S) -> ObserverState
    where
        S: NotificationSource<T> + ?Sized,
    {
        self.subscribe();
        while self.state == ObserverState::Observing {
            match source.next_notification().await {
                Some(notification) => {
                    self.deliver(notification);
                }
                None => break,
            }
        }
        self.state
    }
}

/// Observe `source` once with `reaction`
///
/// ```rust
/// use app_state::invocation::Invocation;
/// use app_state::observe::{observe_once, ObserverState};
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut seen = Vec::new();
/// let mut invocation = Invocation::new(async { Ok("saved") });
/// let state = observe_once(&mut invocation, |n| seen.push(n)).await;
///
/// assert_eq!(state, ObserverState::Done);
/// assert_eq!(seen.len(), 2);
/// # }
/// ```
pub async fn observe_once<T, S, F>(source: &mut S, reaction: F) -> ObserverState
where
    S: NotificationSource<T> + ?Sized,
    F: FnMut(Notification<T>),
{
    ObserveOnce::new(reaction).observe(source).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::{Invocation, NotificationCell};
    use crate::notification::OperationError;
    use lostfound_client::ApiError;

    #[test]
    fn test_state_transitions() {
        let mut calls = 0;
        let mut observer = ObserveOnce::new(|_: Notification<i32>| calls += 1);
        assert_eq!(observer.state(), ObserverState::Idle);

        // Not attached yet
        assert!(!observer.deliver(Notification::Loading));

        observer.subscribe();
        assert_eq!(observer.state(), ObserverState::Observing);

        assert!(observer.deliver(Notification::Loading));
        assert_eq!(observer.state(), ObserverState::Observing);

        assert!(observer.deliver(Notification::Success(1)));
        assert_eq!(observer.state(), ObserverState::Done);

        assert!(!observer.deliver(Notification::Success(1)));
        assert!(!observer.deliver(Notification::Error("late".to_string())));
        observer.subscribe();
        assert_eq!(observer.state(), ObserverState::Done);

        drop(observer);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_error_is_terminal() {
        let mut seen = Vec::new();
        let mut observer = ObserveOnce::new(|n: Notification<i32>| seen.push(n));
        observer.subscribe();
        observer.deliver(Notification::Error("boom".to_string()));
        observer.deliver(Notification::Loading);

        assert_eq!(observer.state(), ObserverState::Done);
        drop(observer);
        assert_eq!(seen, vec![Notification::Error("boom".to_string())]);
    }

    #[tokio::test]
    async fn test_observe_invocation() {
        let mut seen = Vec::new();
        let mut invocation = Invocation::new(async { Ok(4) });

        let state = observe_once(&mut invocation, |n| seen.push(n)).await;

        assert_eq!(state, ObserverState::Done);
        assert_eq!(seen, vec![Notification::Loading, Notification::Success(4)]);
    }

    #[tokio::test]
    async fn test_observe_failed_invocation() {
        let mut seen = Vec::new();
        let mut invocation: Invocation<()> = Invocation::new(async {
            Err(OperationError::from(ApiError::Transport("connection refused".to_string())))
        });

        observe_once(&mut invocation, |n| seen.push(n)).await;

        assert_eq!(seen.len(), 2);
        assert!(seen[0].is_loading());
        assert!(seen[1].error().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn test_observe_spawned_invocation() {
        let mut seen = Vec::new();
        let mut rx = Invocation::new(async { Ok("done") }).spawn();

        let state = observe_once(&mut rx, |n| seen.push(n)).await;

        assert_eq!(state, ObserverState::Done);
        assert_eq!(seen, vec![Notification::Loading, Notification::Success("done")]);
    }

    #[tokio::test]
    async fn test_replayed_terminal_reacts_once() {
        let cell = NotificationCell::new();
        cell.drive(Invocation::new(async { Ok(11) })).await;

        let mut changed = 0;
        let mut observer = ObserveOnce::new(|n: Notification<i32>| {
            if n.is_terminal() {
                changed += 1;
            }
        });

        // Lifecycle replay: the same observer is attached twice
        let mut first = cell.subscribe();
        observer.observe(&mut first).await;
        let mut second = cell.subscribe();
        let state = observer.observe(&mut second).await;

        assert_eq!(state, ObserverState::Done);
        drop(observer);
        assert_eq!(changed, 1);
    }

    #[tokio::test]
    async fn test_closed_source_leaves_observing() {
        let cell: NotificationCell<i32> = NotificationCell::new();
        let mut replay = cell.subscribe();
        drop(cell);

        let state = observe_once(&mut replay, |_| {}).await;
        assert_eq!(state, ObserverState::Observing);
    }
}
