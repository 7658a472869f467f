use std::time::Duration;

use chrono::Local;
use clap::Args;

use endure::config::ClientConfig;
use endure::digest::Digest;
use endure::parser;
use endure::protocol::PollOutcome;

use super::{client_for, CommandError};

/// Pause before retrying after a failed request
const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Follow the plan and print a summary whenever it changes
#[derive(Args)]
pub struct WatchCommand {
    /// Document URL
    pub url: Option<String>,
}

impl WatchCommand {
    pub async fn run(&self, config: &ClientConfig) -> Result<(), CommandError> {
        let client = client_for(self.url.as_deref(), config)?;
        println!("Watching {} (Ctrl-C to stop)", client.url());

        let mut hash: Option<Digest> = None;
        loop {
            let known = match hash.clone() {
                Some(known) => known,
                None => match client.fetch().await {
                    Ok(snapshot) => {
                        let plan = parser::parse(&snapshot.content, Local::now().naive_local());
                        println!(
                            "[{}] {} consumed, {} upcoming",
                            Local::now().format("%H:%M:%S"),
                            plan.calories_consumed,
                            plan.upcoming.len()
                        );
                        if let Some(next) = plan.upcoming.first() {
                            println!("  next: {}", next);
                        }
                        hash = Some(snapshot.hash.clone());
                        snapshot.hash
                    }
                    Err(e) => {
                        eprintln!("Fetch failed: {}", e);
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }
                },
            };

            match client.poll(&known).await {
                Ok(PollOutcome::Changed { .. }) => {
                    // Re-fetch the full document before polling again.
                    hash = None;
                }
                Ok(PollOutcome::Unchanged) => {}
                Err(e) => {
                    eprintln!("Poll failed: {}", e);
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}
