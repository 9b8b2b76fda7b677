mod favorites;
mod history;
mod prompt;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::favorites::FavoritesCommands;
use crate::history::HistoryCommands;

#[derive(Debug, Parser)]
#[command(name = "partfinder")]
#[command(about = "Search tool-part vendors and open the results in your browser")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every vendor for a part
    Search {
        /// Brand, model, part description, or part number
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Restrict the search to a vendor (repeatable)
        #[arg(long = "vendor")]
        vendors: Vec<String>,
        /// Open every ready result in a new browser tab
        #[arg(long)]
        open_all: bool,
        /// Skip the confirmation prompt before opening tabs
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Search, then open a single result by its number
    Open {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Result number as printed by `search` (1-based)
        #[arg(long)]
        index: usize,
        #[arg(long = "vendor")]
        vendors: Vec<String>,
    },
    /// Recent searches
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Saved parts for repeat orders
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = partfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let client = partfinder_client::PartfinderClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("failed to build backend client: {e}"))?;
    tracing::debug!(api_url = %config.api_url, env = %config.env, "client ready");

    match cli.command {
        Commands::Search {
            query,
            vendors,
            open_all,
            yes,
        } => {
            let request = search::SearchArgs {
                query: query.join(" "),
                vendors,
                open_all,
                assume_yes: yes,
            };
            search::run_search(client, &config, request).await
        }
        Commands::Open {
            query,
            index,
            vendors,
        } => search::run_open(client, &config, &query.join(" "), vendors, index).await,
        Commands::History { command } => history::run_history(client, &config, command).await,
        Commands::Favorites { command } => {
            favorites::run_favorites(client, &config, command).await
        }
    }
}
