mod config_cmd;
mod edit;
mod show;
mod watch;

pub use config_cmd::ConfigCommand;
pub use edit::EditCommand;
pub use show::ShowCommand;
pub use watch::WatchCommand;

use clap::ValueEnum;
use thiserror::Error;

use endure::client::{ClientError, SyncClient};
use endure::config::ClientConfig;
use endure::editor::EditorError;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Errors from CLI commands
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("No server URL given. Pass one or set server_url in config / ENDURE_URL.")]
    MissingUrl,

    #[error("push rejected: document changed on server")]
    Conflict,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("Editor task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to format output")]
    Format(#[from] std::fmt::Error),
}

/// Builds a client from the command-line URL, falling back to config.
fn client_for(url: Option<&str>, config: &ClientConfig) -> Result<SyncClient, CommandError> {
    url.or(config.server_url.value.as_deref())
        .map(|url| SyncClient::new(url).with_poll_timeout(config.poll_timeout()))
        .ok_or(CommandError::MissingUrl)
}
