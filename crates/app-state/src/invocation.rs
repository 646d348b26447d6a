//! Single-run operation invocations
//!
//! An [`Invocation`] wraps exactly one remote (or local) call. It is lazy:
//! nothing runs until it is polled. Polling yields `Loading` first (unless
//! the operation is local), then awaits the call once and yields the
//! terminal notification, then nothing.
//!
//! ```rust
//! use app_state::invocation::Invocation;
//! use app_state::notification::Notification;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut invocation = Invocation::new(async { Ok(7) });
//! assert_eq!(invocation.next().await, Some(Notification::Loading));
//! assert_eq!(invocation.next().await, Some(Notification::Success(7)));
//! assert_eq!(invocation.next().await, None);
//! # }
//! ```

use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::{mpsc, watch};

use crate::notification::{Notification, Result};
use lostfound_client::GENERIC_ERROR_MESSAGE;

type Operation<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

/// Anything that hands out notifications one at a time
///
/// Returns `None` once the source is closed.
#[async_trait]
pub trait NotificationSource<T>: Send {
    /// Wait for the next notification
    async fn next_notification(&mut self) -> Option<Notification<T>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Created,
    Started,
    Finished,
}

/// One lazily-run operation and its notification sequence
pub struct Invocation<T> {
    operation: Option<Operation<T>>,
    emits_loading: bool,
    stage: Stage,
}

impl<T> Invocation<T> {
    /// Remote operation: yields `Loading` before the terminal notification
    pub fn new<F>(operation: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self { operation: Some(Box::pin(operation)), emits_loading: true, stage: Stage::Created }
    }

    /// Local operation: yields only the terminal notification
    pub fn local<F>(operation: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self { operation: Some(Box::pin(operation)), emits_loading: false, stage: Stage::Created }
    }

    /// Whether the terminal notification has been produced
    pub fn is_finished(&self) -> bool {
        self.stage == Stage::Finished
    }

    /// Next notification of the sequence, or `None` once finished
    pub async fn next(&mut self) -> Option<Notification<T>> {
        match self.stage {
            Stage::Created if self.emits_loading => {
                self.stage = Stage::Started;
                Some(Notification::Loading)
            }
            Stage::Created | Stage::Started => {
                self.stage = Stage::Finished;
                let operation = self.operation.take()?;
                Some(operation.await.into())
            }
            Stage::Finished => None,
        }
    }

    /// Run to completion and return only the terminal notification
    pub async fn outcome(mut self) -> Notification<T> {
        self.stage = Stage::Finished;
        match self.operation.take() {
            Some(operation) => operation.await.into(),
            None => Notification::Error(GENERIC_ERROR_MESSAGE.to_string()),
        }
    }
}

impl<T: Send + 'static> Invocation<T> {
    /// Run on a background task, delivering notifications over a channel
    ///
    /// Dropping the receiver does not cancel the call; its notifications are
    /// discarded.
    pub fn spawn(self) -> NotificationReceiver<T> {
        let (tx, rx) = mpsc::channel(2);
        let mut invocation = self;

        tokio::spawn(async move {
            while let Some(notification) = invocation.next().await {
                if tx.send(notification).await.is_err() {
                    tracing::trace!("observer went away; discarding notification");
                }
            }
        });

        NotificationReceiver { rx }
    }
}

#[async_trait]
impl<T: Send> NotificationSource<T> for Invocation<T> {
    async fn next_notification(&mut self) -> Option<Notification<T>> {
        self.next().await
    }
}

/// Receiving end of a spawned invocation
pub struct NotificationReceiver<T> {
    rx: mpsc::Receiver<Notification<T>>,
}

impl<T> NotificationReceiver<T> {
    /// Wait for the next notification; `None` after the terminal one
    pub async fn recv(&mut self) -> Option<Notification<T>> {
        self.rx.recv().await
    }
}

#[async_trait]
impl<T: Send> NotificationSource<T> for NotificationReceiver<T> {
    async fn next_notification(&mut self) -> Option<Notification<T>> {
        self.recv().await
    }
}

/// Latest-value holder that replays to every new subscriber
///
/// This models a lifecycle-aware broadcast: an observer that re-attaches
/// (for instance after its screen is rebuilt) immediately receives the
/// latest notification again.
pub struct NotificationCell<T> {
    tx: watch::Sender<Option<Notification<T>>>,
}

impl<T> Default for NotificationCell<T> {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }
}

impl<T> NotificationCell<T> {
    /// Empty cell
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the latest notification and wake subscribers
    pub fn publish(&self, notification: Notification<T>) {
        self.tx.send_replace(Some(notification));
    }

    /// Attach a new observer; it first sees the latest value, if any
    pub fn subscribe(&self) -> Replay<T> {
        Replay { rx: self.tx.subscribe(), primed: false }
    }
}

impl<T: Send + 'static> NotificationCell<T> {
    /// Drive `invocation` to completion, publishing each notification
    pub async fn drive(&self, mut invocation: Invocation<T>) {
        while let Some(notification) = invocation.next().await {
            self.publish(notification);
        }
    }
}

/// Subscription to a [`NotificationCell`]
pub struct Replay<T> {
    rx: watch::Receiver<Option<Notification<T>>>,
    primed: bool,
}

#[async_trait]
impl<T: Clone + Send + Sync> NotificationSource<T> for Replay<T> {
    async fn next_notification(&mut self) -> Option<Notification<T>> {
        if !self.primed {
            self.primed = true;
            let current = self.rx.borrow_and_update().clone();
            if current.is_some() {
                return current;
            }
        }

        loop {
            self.rx.changed().await.ok()?;
            let current = self.rx.borrow_and_update().clone();
            if current.is_some() {
                return current;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::OperationError;
    use lostfound_client::ApiError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn failing() -> Invocation<i32> {
        Invocation::new(async { Err(OperationError::from(ApiError::application(401, "nope"))) })
    }

    #[tokio::test]
    async fn test_remote_sequence() {
        let mut invocation = Invocation::new(async { Ok(1) });
        assert!(!invocation.is_finished());
        assert_eq!(invocation.next().await, Some(Notification::Loading));
        assert_eq!(invocation.next().await, Some(Notification::Success(1)));
        assert!(invocation.is_finished());
        assert_eq!(invocation.next().await, None);
        assert_eq!(invocation.next().await, None);
    }

    #[tokio::test]
    async fn test_error_sequence() {
        let mut invocation = failing();
        assert_eq!(invocation.next().await, Some(Notification::Loading));
        assert_eq!(invocation.next().await, Some(Notification::Error("nope".to_string())));
        assert_eq!(invocation.next().await, None);
    }

    #[tokio::test]
    async fn test_local_sequence_skips_loading() {
        let mut invocation = Invocation::local(async { Ok("session") });
        assert_eq!(invocation.next().await, Some(Notification::Success("session")));
        assert_eq!(invocation.next().await, None);
    }

    #[tokio::test]
    async fn test_lazy_until_polled() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let mut invocation = Invocation::new(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert_eq!(runs.load(Ordering::SeqCst), 0);
        invocation.next().await; // Loading only
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        invocation.next().await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        invocation.next().await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_outcome_returns_terminal() {
        assert_eq!(Invocation::new(async { Ok(5) }).outcome().await, Notification::Success(5));
        assert_eq!(failing().outcome().await, Notification::Error("nope".to_string()));
    }

    #[tokio::test]
    async fn test_spawn_delivers_in_order() {
        let mut rx = Invocation::new(async { Ok(9) }).spawn();
        assert_eq!(rx.recv().await, Some(Notification::Loading));
        assert_eq!(rx.recv().await, Some(Notification::Success(9)));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_spawn_runs_without_observer() {
        let (done_tx, done_rx) = tokio::sync::oneshot::channel();
        let rx = Invocation::new(async move {
            let _ = done_tx.send(());
            Ok(())
        })
        .spawn();
        drop(rx);

        done_rx.await.unwrap();
    }

    #[tokio::test]
    async fn test_replay_redelivers_latest() {
        let cell = NotificationCell::new();
        cell.drive(Invocation::new(async { Ok(3) })).await;

        let mut first = cell.subscribe();
        assert_eq!(first.next_notification().await, Some(Notification::Success(3)));

        // A re-attached observer sees the same terminal value again
        let mut second = cell.subscribe();
        assert_eq!(second.next_notification().await, Some(Notification::Success(3)));
    }

    #[tokio::test]
    async fn test_replay_waits_for_publish() {
        let cell = Arc::new(NotificationCell::new());
        let mut replay = cell.subscribe();

        let publisher = Arc::clone(&cell);
        tokio::spawn(async move {
            publisher.publish(Notification::Success("late"));
        });

        assert_eq!(replay.next_notification().await, Some(Notification::Success("late")));
    }

    #[tokio::test]
    async fn test_replay_closes_with_cell() {
        let cell: NotificationCell<i32> = NotificationCell::new();
        let mut replay = cell.subscribe();
        drop(cell);

        assert_eq!(replay.next_notification().await, None);
    }
}
