//! Fetch, conditional push and long-poll over the shared document.
//!
//! One `tokio::sync::Mutex` guards the store. Reading the digest, writing
//! new content, arming a long-poll wait and notifying waiters all happen
//! under it.
//!
//! Each outstanding long-poll holds one request task for up to the poll
//! timeout. There is no cap on concurrent pollers.

use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::Mutex;

use super::notifier::{ChangeNotifier, WaitOutcome};
use super::storage::{ContentStore, StoreError};
use crate::digest::Digest;
use crate::models::ParsedPlan;
use crate::parser;
use crate::protocol::{PollOutcome, PushOutcome, Snapshot};

/// Default long-poll timeout.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// The document, its wait/notify point, and the protocol on top of them.
#[derive(Debug)]
pub struct SyncService {
    store: Mutex<ContentStore>,
    notifier: ChangeNotifier,
    poll_timeout: Duration,
}

impl SyncService {
    pub fn new(store: ContentStore) -> Self {
        Self::with_poll_timeout(store, DEFAULT_POLL_TIMEOUT)
    }

    pub fn with_poll_timeout(store: ContentStore, poll_timeout: Duration) -> Self {
        Self {
            store: Mutex::new(store),
            notifier: ChangeNotifier::new(),
            poll_timeout,
        }
    }

    pub fn poll_timeout(&self) -> Duration {
        self.poll_timeout
    }

    /// Returns the current document and digest.
    pub async fn fetch(&self) -> Result<Snapshot, StoreError> {
        let store = self.store.lock().await;
        let (content, hash) = store.read()?;
        Ok(Snapshot { content, hash })
    }

    /// Writes `content` unless `client_hash` is given and stale.
    ///
    /// A push without a digest always overwrites.
    pub async fn push(
        &self,
        content: &str,
        client_hash: Option<&Digest>,
    ) -> Result<PushOutcome, StoreError> {
        let store = self.store.lock().await;
        let (current_content, current_hash) = store.read()?;

        if let Some(client_hash) = client_hash {
            if *client_hash != current_hash {
                tracing::warn!(
                    client = %client_hash,
                    current = %current_hash,
                    "Rejected push with stale digest"
                );
                return Ok(PushOutcome::Conflict { current_content });
            }
        } else {
            tracing::info!("Unconditional push, overwriting document");
        }

        let hash = store.write(content)?;
        self.notifier.notify_all();
        tracing::info!(
            hash = %hash,
            bytes = content.len(),
            "Document updated"
        );

        Ok(PushOutcome::Accepted { hash })
    }

    /// Waits up to `timeout` (default: the configured poll timeout) for the
    /// document digest to differ from `client_hash`.
    ///
    /// `None` means the caller knows no digest, which is always stale.
    pub async fn poll(
        &self,
        client_hash: Option<&Digest>,
        timeout: Option<Duration>,
    ) -> Result<PollOutcome, StoreError> {
        let Some(client_hash) = client_hash else {
            let hash = self.current_hash().await?;
            return Ok(PollOutcome::Changed { hash });
        };
        let timeout = timeout.unwrap_or(self.poll_timeout);

        let registration = {
            let store = self.store.lock().await;
            let (_, current_hash) = store.read()?;
            if current_hash != *client_hash {
                return Ok(PollOutcome::Changed { hash: current_hash });
            }
            self.notifier.register()
        };

        let woke = registration.wait_with_timeout(timeout).await;

        // Notified or not, the digest decides.
        let current_hash = self.current_hash().await?;
        let outcome = if current_hash != *client_hash {
            PollOutcome::Changed { hash: current_hash }
        } else {
            PollOutcome::Unchanged
        };

        let notified = woke == WaitOutcome::Notified;
        let changed = matches!(outcome, PollOutcome::Changed { .. });
        tracing::debug!(notified, changed, "Long-poll finished");

        Ok(outcome)
    }

    /// Parses the current document as of `now`. Recomputed on every call.
    pub async fn plan(&self, now: NaiveDateTime) -> Result<ParsedPlan, StoreError> {
        let snapshot = self.fetch().await?;
        Ok(parser::parse(&snapshot.content, now))
    }

    async fn current_hash(&self) -> Result<Digest, StoreError> {
        let store = self.store.lock().await;
        store.read().map(|(_, hash)| hash)
    }
}
