use clap::Args;

use endure::config::ClientConfig;
use endure::editor;
use endure::protocol::PushOutcome;

use super::{client_for, CommandError};

/// Fetch the plan, open it in $EDITOR, and push the result
#[derive(Args)]
pub struct EditCommand {
    /// Document URL, e.g. display.local:5000/api/reminders
    pub url: Option<String>,

    /// Push even if the document changed on the server meanwhile
    #[arg(long)]
    pub force: bool,
}

impl EditCommand {
    pub async fn run(&self, config: &ClientConfig) -> Result<(), CommandError> {
        let client = client_for(self.url.as_deref(), config)?;

        println!("Fetching {}...", client.url());
        let snapshot = client.fetch().await?;

        println!("Opening in {}...", editor::editor_command());
        let content = snapshot.content.clone();
        let edited = tokio::task::spawn_blocking(move || editor::edit(&content))
            .await??;

        if edited == snapshot.content {
            println!("No changes made.");
            return Ok(());
        }

        println!("Saving changes...");
        let base = if self.force {
            None
        } else {
            Some(&snapshot.hash)
        };

        match client.push(&edited, base).await? {
            PushOutcome::Accepted { .. } => {
                println!("✓ File saved successfully");
                Ok(())
            }
            PushOutcome::Conflict { current_content } => {
                eprint!("{}", conflict_report(&current_content));
                Err(CommandError::Conflict)
            }
        }
    }
}

fn conflict_report(current_content: &str) -> String {
    format!(
        "⚠️  CONFLICT: File has been modified on server\n\
         \nCurrent server content:\n{}\n\
         \nYour changes were not saved.\n\
         Fetch the file again to see current version.\n",
        current_content
    )
}
