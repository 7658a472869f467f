use chrono::Local;
use clap::Args;

use endure::config::ClientConfig;
use endure::parser;

use super::{client_for, CommandError, OutputFormat};

/// Items shown before collapsing the rest into "+N more"
const DISPLAY_LIMIT: usize = 3;

/// Show the plan as it stands right now
#[derive(Args)]
pub struct ShowCommand {
    /// Document URL
    pub url: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// List every upcoming item instead of the next few
    #[arg(long, short)]
    pub all: bool,
}

impl ShowCommand {
    pub async fn run(&self, config: &ClientConfig) -> Result<(), CommandError> {
        let client = client_for(self.url.as_deref(), config)?;
        let snapshot = client.fetch().await?;
        let plan = parser::parse(&snapshot.content, Local::now().naive_local());

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            }
            OutputFormat::Text if self.all => {
                print!("{}", plan);
            }
            OutputFormat::Text => {
                let mut header = String::new();
                plan.write_header(&mut header)?;
                print!("{}", header);
                println!();

                let (shown, rest) = plan.display_items(DISPLAY_LIMIT);
                if shown.is_empty() {
                    println!("Nothing left for today.");
                }
                for item in shown {
                    println!("  {}", item);
                }
                if rest > 0 {
                    println!("  +{} more", rest);
                }
            }
        }

        Ok(())
    }
}
