//! `favorites` command handlers.

use clap::Subcommand;
use partfinder_client::{ClientError, PartfinderClient};
use partfinder_core::display::favorite_label;
use partfinder_core::{AppConfig, Favorite};

use crate::prompt::confirm;
use crate::search::{run_search, SearchArgs};

#[derive(Debug, Subcommand)]
pub(crate) enum FavoritesCommands {
    /// List saved parts, most ordered first
    List,
    /// Save a part and the query that finds it
    Add {
        /// Short description, e.g. "DTD152 brushes"
        description: String,
        /// Search query to run for this part
        #[arg(long)]
        query: String,
    },
    /// Delete a saved part
    Remove {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Record that a saved part was ordered again
    Ordered { id: String },
    /// Run the saved query for a part
    Search {
        id: String,
        #[arg(long)]
        open_all: bool,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

pub(crate) async fn run_favorites(
    client: PartfinderClient,
    config: &AppConfig,
    command: FavoritesCommands,
) -> anyhow::Result<()> {
    match command {
        FavoritesCommands::List => {
            let response = client.list_favorites().await?;
            print!("{}", render_favorites(&response.favorites));
        }
        FavoritesCommands::Add { description, query } => {
            let favorite = client.create_favorite(&description, &query).await?;
            println!("saved {} [{}]", favorite_label(&favorite), favorite.id);
        }
        FavoritesCommands::Remove { id, yes } => {
            if !yes && !confirm(&format!("Remove favorite {id}?"))? {
                println!("favorite kept");
                return Ok(());
            }
            match client.delete_favorite(&id).await {
                Ok(_) => println!("removed {id}"),
                Err(ClientError::NotFound { .. }) => anyhow::bail!("no favorite with id {id}"),
                Err(e) => return Err(e.into()),
            }
        }
        FavoritesCommands::Ordered { id } => {
            let favorite = match client.increment_favorite_orders(&id).await {
                Ok(favorite) => favorite,
                Err(ClientError::NotFound { .. }) => anyhow::bail!("no favorite with id {id}"),
                Err(e) => return Err(e.into()),
            };
            println!("{}", favorite_label(&favorite));
        }
        FavoritesCommands::Search { id, open_all, yes } => {
            let response = client.list_favorites().await?;
            let Some(favorite) = response.favorites.iter().find(|f| f.id == id) else {
                anyhow::bail!("no favorite with id {id}");
            };
            let args = SearchArgs {
                query: favorite.search_query.clone(),
                vendors: Vec::new(),
                open_all,
                assume_yes: yes,
            };
            return run_search(client, config, args).await;
        }
    }
    Ok(())
}

pub(crate) fn render_favorites(favorites: &[Favorite]) -> String {
    use std::fmt::Write;

    if favorites.is_empty() {
        return "no favorites saved\n".to_string();
    }
    let mut out = String::new();
    for favorite in favorites {
        let _ = writeln!(
            out,
            "{:<26} {:<32} {}",
            favorite.id,
            favorite_label(favorite),
            favorite.search_query
        );
    }
    out
}
