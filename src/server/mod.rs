//! Server-side modules for the plan sync server.

pub mod notifier;
pub mod routes;
pub mod service;
pub mod storage;

pub use notifier::{ChangeNotifier, Registration, WaitOutcome};
pub use routes::{router, ApiError};
pub use service::{SyncService, DEFAULT_POLL_TIMEOUT};
pub use storage::{ContentStore, StoreError, DEFAULT_TEMPLATE};
