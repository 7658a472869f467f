//! Wake-ups for long-poll requests.
//!
//! A poller registers interest *while holding the document lock*, after it
//! has compared digests, and only then releases the lock and waits. Writers
//! call [`ChangeNotifier::notify_all`] while still holding the same lock, so
//! every write that lands after a poller's check is seen by that poller.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::futures::Notified;
use tokio::sync::Notify;

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Notified,
    TimedOut,
}

/// Process-wide wait/notify point for document changes.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    notify: Notify,
}

/// A pending wait, armed before the document lock was released.
pub struct Registration<'a> {
    notified: Pin<Box<Notified<'a>>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a wait. Call this under the document lock.
    pub fn register(&self) -> Registration<'_> {
        let mut notified = Box::pin(self.notify.notified());
        notified.as_mut().enable();
        Registration { notified }
    }

    /// Wakes every registered waiter. Nothing is remembered for waiters
    /// that register afterwards.
    pub fn notify_all(&self) {
        self.notify.notify_waiters();
    }
}

impl<'a> Registration<'a> {
    /// Blocks until notified or `timeout` elapses.
    pub async fn wait_with_timeout(self, timeout: Duration) -> WaitOutcome {
        match tokio::time::timeout(timeout, self).await {
            Ok(()) => WaitOutcome::Notified,
            Err(_) => WaitOutcome::TimedOut,
        }
    }
}

impl<'a> Future for Registration<'a> {
    type Output = ();

    fn poll(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        self.notified.as_mut().poll(cx)
    }
}
