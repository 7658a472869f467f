use clap::{Args, Subcommand};

use endure::config::ClientConfig;

use super::{CommandError, OutputFormat};

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &ClientConfig) -> Result<(), CommandError> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                ClientConfig::default_config_path().display()
                            );
                        }
                        println!();

                        println!(
                            "server_url: {}",
                            config.server_url.value.as_deref().unwrap_or("(not set)")
                        );
                        println!("  source: {}", config.server_url.source);
                        println!(
                            "poll_timeout_secs: {}",
                            config.poll_timeout_secs.value
                        );
                        println!("  source: {}", config.poll_timeout_secs.source);
                    }
                }
                Ok(())
            }
        }
    }
}
