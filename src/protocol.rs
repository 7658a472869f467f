//! JSON bodies exchanged between the server and its clients.
//!
//! - `GET /api/reminders` -> [`Snapshot`]
//! - `POST /api/reminders` with [`PushRequest`] -> [`PushAccepted`] (200)
//!   or [`ConflictResponse`] (409)
//! - `GET /api/poll?hash=..` -> [`PollResponse`]

use serde::{Deserialize, Serialize};

use crate::digest::Digest;

/// The document and its digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub content: String,
    pub hash: Digest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushRequest {
    pub content: String,
    /// Digest the edit was based on. `None` forces the write.
    #[serde(default)]
    pub hash: Option<Digest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushAccepted {
    pub status: String,
    pub hash: Digest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictResponse {
    pub current_content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollQuery {
    pub hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollResponse {
    pub changed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<Digest>,
}

/// Error body for 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Result of a conditional push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Accepted { hash: Digest },
    /// The supplied digest was stale. Carries what the server has now.
    Conflict { current_content: String },
}

/// Result of a long-poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Changed { hash: Digest },
    Unchanged,
}

impl From<PollOutcome> for PollResponse {
    fn from(outcome: PollOutcome) -> Self {
        match outcome {
            PollOutcome::Changed { hash } => PollResponse {
                changed: true,
                hash: Some(hash),
            },
            PollOutcome::Unchanged => PollResponse {
                changed: false,
                hash: None,
            },
        }
    }
}

impl TryFrom<PollResponse> for PollOutcome {
    type Error = &'static str;

    fn try_from(response: PollResponse) -> Result<Self, Self::Error> {
        match (response.changed, response.hash) {
            (true, Some(hash)) => Ok(PollOutcome::Changed { hash }),
            (true, None) => Err("changed poll response without hash"),
            (false, _) => Ok(PollOutcome::Unchanged),
        }
    }
}
