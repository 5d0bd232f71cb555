mod cli;
mod config;
mod dispatch;
mod error;
mod matching;
mod profile;
mod relay;
mod server;
mod store;
mod telegram;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mingle",
    version,
    about = "Telegram companion bot with an LLM chat relay and interest matching"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the bot (long polling)
    Serve,
    /// Show profile store statistics
    Stats,
    /// Show one stored profile
    Inspect {
        /// Telegram user id
        user_id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = config::MingleConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for CLI report output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            server::run(config).await?;
        }
        Command::Stats => {
            cli::stats::stats(&config).await?;
        }
        Command::Inspect { user_id } => {
            cli::inspect::inspect(&config, user_id).await?;
        }
    }

    Ok(())
}
