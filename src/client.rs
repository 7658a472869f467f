//! HTTP client for the document endpoint.
//!
//! The client is given the document URL (e.g.
//! `http://display.local:5000/api/reminders`); the poll endpoint is
//! derived from it.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::digest::Digest;
use crate::protocol::{
    ConflictResponse, PollOutcome, PollResponse, PushAccepted, PushOutcome, PushRequest, Snapshot,
};
use crate::server::DEFAULT_POLL_TIMEOUT;

/// Slack on top of the server's long-poll timeout before giving up.
pub const POLL_GRACE: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Status(StatusCode),

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

/// Client for one document URL.
#[derive(Debug, Clone)]
pub struct SyncClient {
    url: String,
    http: reqwest::Client,
    poll_timeout: Duration,
}

impl SyncClient {
    /// Creates a client, assuming `http://` when the URL has no scheme.
    pub fn new(url: impl AsRef<str>) -> Self {
        Self {
            url: normalize_url(url.as_ref()),
            http: reqwest::Client::new(),
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Sets the server's long-poll timeout. Poll requests are given
    /// [`POLL_GRACE`] on top of it before they fail.
    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    /// How long a single poll request may take.
    pub fn poll_request_timeout(&self) -> Duration {
        self.poll_timeout + POLL_GRACE
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches content and digest.
    pub async fn fetch(&self) -> Result<Snapshot, ClientError> {
        let response = self.http.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Pushes `content` based on `hash`. `None` forces the write.
    pub async fn push(
        &self,
        content: &str,
        hash: Option<&Digest>,
    ) -> Result<PushOutcome, ClientError> {
        let request = PushRequest {
            content: content.to_string(),
            hash: hash.cloned(),
        };
        let response = self.http.post(&self.url).json(&request).send().await?;

        match response.status() {
            StatusCode::CONFLICT => {
                let body: ConflictResponse = response
                    .json()
                    .await
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
                Ok(PushOutcome::Conflict {
                    current_content: body.current_content,
                })
            }
            status if status.is_success() => {
                let body: PushAccepted = response
                    .json()
                    .await
                    .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
                Ok(PushOutcome::Accepted { hash: body.hash })
            }
            status => Err(ClientError::Status(status)),
        }
    }

    /// Long-polls for a change away from `hash`.
    pub async fn poll(&self, hash: &Digest) -> Result<PollOutcome, ClientError> {
        let url = format!(
            "{}?hash={}",
            self.poll_url(),
            urlencoding::encode(hash.as_str())
        );
        let response = self
            .http
            .get(&url)
            .timeout(self.poll_request_timeout())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let body: PollResponse = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        PollOutcome::try_from(body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Base URL of the server, keeping scheme and authority.
    fn base_url(&self) -> &str {
        let after_scheme = self.url.find("://").map(|i| i + 3).unwrap_or(0);
        match self.url[after_scheme..].find('/') {
            Some(i) => &self.url[..after_scheme + i],
            None => &self.url,
        }
    }

    fn poll_url(&self) -> String {
        format!("{}/api/poll", self.base_url())
    }
}

fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{router, ContentStore, SyncService, DEFAULT_TEMPLATE};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_url_adds_scheme() {
        let client = SyncClient::new("display.local:5000/api/reminders");
        assert_eq!(client.url(), "http://display.local:5000/api/reminders");
    }

    #[test]
    fn test_normalize_url_keeps_https() {
        let client = SyncClient::new("https://plan.example.com/api/reminders");
        assert_eq!(client.url(), "https://plan.example.com/api/reminders");
    }

    #[test]
    fn test_poll_url_derived_from_document_url() {
        let client = SyncClient::new("http://localhost:5000/api/reminders");
        assert_eq!(client.poll_url(), "http://localhost:5000/api/poll");

        let bare = SyncClient::new("localhost:5000");
        assert_eq!(bare.poll_url(), "http://localhost:5000/api/poll");
    }

    #[test]
    fn test_poll_request_timeout_follows_server_timeout() {
        let client = SyncClient::new("localhost:5000");
        assert_eq!(client.poll_request_timeout(), DEFAULT_POLL_TIMEOUT + POLL_GRACE);

        let client = client.with_poll_timeout(Duration::from_secs(45));
        assert_eq!(
            client.poll_request_timeout(),
            Duration::from_secs(45) + POLL_GRACE
        );
    }

    async fn spawn_server() -> (SyncClient, TempDir) {
        spawn_server_with_timeout(DEFAULT_POLL_TIMEOUT).await
    }

    async fn spawn_server_with_timeout(poll_timeout: Duration) -> (SyncClient, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::new(temp_dir.path().join("reminders.txt"));
        let service = Arc::new(SyncService::with_poll_timeout(store, poll_timeout));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(service)).await.unwrap();
        });

        let client = SyncClient::new(format!("http://{}/api/reminders", addr))
            .with_poll_timeout(poll_timeout);
        (client, temp_dir)
    }

    #[tokio::test]
    async fn test_fetch_push_conflict_against_server() {
        let (client, _temp) = spawn_server().await;

        let snapshot = client.fetch().await.unwrap();
        assert_eq!(snapshot.content, DEFAULT_TEMPLATE);

        let accepted = client
            .push("10:00 | Tea", Some(&snapshot.hash))
            .await
            .unwrap();
        assert_eq!(
            accepted,
            PushOutcome::Accepted {
                hash: Digest::of("10:00 | Tea")
            }
        );

        // Same stale digest again.
        let conflict = client
            .push("11:00 | Coffee", Some(&snapshot.hash))
            .await
            .unwrap();
        assert_eq!(
            conflict,
            PushOutcome::Conflict {
                current_content: "10:00 | Tea".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_poll_against_server() {
        let (client, _temp) = spawn_server().await;

        let outcome = client.poll(&Digest::from_client("old")).await.unwrap();
        assert_eq!(
            outcome,
            PollOutcome::Changed {
                hash: Digest::of(DEFAULT_TEMPLATE)
            }
        );
    }

    #[tokio::test]
    async fn test_poll_unchanged_with_short_server_timeout() {
        let (client, _temp) = spawn_server_with_timeout(Duration::from_millis(200)).await;
        let snapshot = client.fetch().await.unwrap();

        let outcome = client.poll(&snapshot.hash).await.unwrap();
        assert_eq!(outcome, PollOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_poll_wakes_with_long_server_timeout() {
        let (client, _temp) = spawn_server_with_timeout(Duration::from_secs(45)).await;
        let snapshot = client.fetch().await.unwrap();

        let poller = {
            let client = client.clone();
            let hash = snapshot.hash.clone();
            tokio::spawn(async move { client.poll(&hash).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        client.push("12:00 | Lunch", Some(&snapshot.hash)).await.unwrap();

        assert_eq!(
            poller.await.unwrap().unwrap(),
            PollOutcome::Changed {
                hash: Digest::of("12:00 | Lunch")
            }
        );
    }

    #[tokio::test]
    #[ignore] // Slow: waits out a full 45s long-poll
    async fn test_poll_outlasts_default_timeout() {
        let (client, _temp) = spawn_server_with_timeout(Duration::from_secs(45)).await;
        let snapshot = client.fetch().await.unwrap();

        let outcome = client.poll(&snapshot.hash).await.unwrap();
        assert_eq!(outcome, PollOutcome::Unchanged);
    }

    #[tokio::test]
    async fn test_fetch_unreachable_server() {
        let client = SyncClient::new("http://127.0.0.1:1/api/reminders");
        assert!(matches!(client.fetch().await, Err(ClientError::Http(_))));
    }
}
