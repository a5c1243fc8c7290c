mod lookup;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bizlookup_dataforseo::ReviewSort;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Parser)]
#[command(name = "bizlookup-cli")]
#[command(about = "Business lookup and reviews retrieval via DataForSEO")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find business candidates by name near a location
    Search {
        /// Business name (e.g., "Acme Roofing")
        name: String,
        /// Free-text location (e.g., "Hamilton, ON")
        location: String,
        /// Maximum number of candidates to return
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Same lookup as `search`, with rank, claim status and opening hours
    Raw {
        name: String,
        location: String,
        #[arg(long, default_value = "5")]
        limit: usize,
    },
    /// Retrieve reviews for a place by its Google CID
    Reviews {
        /// Google customer id of the place
        cid: String,
        /// Free-text location used to select the provider region
        location: String,
        /// Number of reviews to request
        #[arg(long, default_value = "20")]
        depth: u32,
        /// newest, highest_rating, lowest_rating or relevant
        #[arg(long, default_value = "newest")]
        sort_by: ReviewSort,
    },
    /// Show the remaining API balance
    Balance,
    /// Show the region a location string resolves to (no API call)
    Classify { location: String },
}

impl Commands {
    fn needs_client(&self) -> bool {
        !matches!(self, Commands::Classify { .. })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if !cli.command.needs_client() {
        init_tracing(DEFAULT_LOG_LEVEL)?;
        return lookup::dispatch_offline(cli.command);
    }

    let config = bizlookup_core::load_app_config()?;
    init_tracing(&config.log_level)?;
    tracing::debug!(env = %config.env, base_url = %config.base_url, "configuration loaded");

    let client = bizlookup_dataforseo::DataForSeoClient::from_app_config(&config)?;
    tracing::debug!(poll = ?client.poll_config(), "client ready");
    lookup::dispatch(&client, cli.command).await
}

/// `RUST_LOG` wins; otherwise the configured level applies.
fn init_tracing(fallback: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests;
