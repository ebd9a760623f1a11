mod commands;
mod render;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use roomcal_core::RoomcalConfig;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "roomcal")]
#[command(about = "Build the room booking payload and search it from the terminal")]
struct Cli {
    /// Override the configured mode ("production" reads the remote feed)
    #[arg(long, global = true)]
    mode: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed and write events.json
    Build {
        #[arg(short, long, default_value = "dist/events.json")]
        out: PathBuf,
    },
    /// Show this week's matching bookings
    Search {
        /// e.g. "A123 linear algebra"
        #[arg(default_value = "")]
        query: String,

        /// Print a shareable link for the query under this URL
        #[arg(long)]
        base_url: Option<Url>,
    },
    /// Show where the config file lives
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { out } => {
            let config = load_config(cli.mode)?;
            commands::build::run(&config, &out).await
        }
        Commands::Search { query, base_url } => {
            let config = load_config(cli.mode)?;
            commands::search::run(&config, &query, base_url.as_ref()).await
        }
        Commands::Config => commands::config::run(),
    }
}

fn load_config(mode: Option<String>) -> Result<RoomcalConfig> {
    let mut config = RoomcalConfig::load()?;
    if let Some(mode) = mode {
        config.mode = mode;
    }
    Ok(config)
}
