//! Endure
//!
//! One plain-text daily plan shared between a passive display, a browser
//! and a command-line editor. Writes are guarded by a content digest;
//! viewers learn about changes by long-polling.

pub mod client;
pub mod config;
pub mod digest;
pub mod editor;
pub mod models;
pub mod parser;
pub mod protocol;
pub mod server;

pub use client::{ClientError, SyncClient};
pub use digest::{digest, Digest};
pub use models::{ParsedPlan, PlanMetadata, ScheduleItem};
pub use protocol::{PollOutcome, PushOutcome, Snapshot};
pub use server::{ContentStore, StoreError, SyncService};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
