//! `history` command handlers.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use partfinder_client::PartfinderClient;
use partfinder_core::display::format_relative;
use partfinder_core::{AppConfig, HistoryEntry};

use crate::prompt::confirm;
use crate::search::{run_search, SearchArgs};

#[derive(Debug, Subcommand)]
pub(crate) enum HistoryCommands {
    /// List recent searches, newest first
    List {
        /// Maximum entries to show (defaults to PARTFINDER_HISTORY_LIMIT)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Delete every history entry
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Run a past search again by its number in `history list`
    Rerun {
        index: usize,
        #[arg(long)]
        open_all: bool,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

pub(crate) async fn run_history(
    client: PartfinderClient,
    config: &AppConfig,
    command: HistoryCommands,
) -> anyhow::Result<()> {
    match command {
        HistoryCommands::List { limit } => {
            let limit = limit.unwrap_or(config.history_limit);
            let response = client.get_history(limit).await?;
            print!("{}", render_history(&response.history, Utc::now()));
            Ok(())
        }
        HistoryCommands::Clear { yes } => {
            if !yes && !confirm("Clear all search history?")? {
                println!("history kept");
                return Ok(());
            }
            let cleared = client.clear_history().await?;
            match cleared.deleted_count {
                Some(n) => println!("cleared {n} history entries"),
                None => println!("history cleared"),
            }
            Ok(())
        }
        HistoryCommands::Rerun {
            index,
            open_all,
            yes,
        } => {
            let response = client.get_history(config.history_limit).await?;
            let Some(entry) = index
                .checked_sub(1)
                .and_then(|i| response.history.get(i))
            else {
                anyhow::bail!(
                    "no history entry #{index}; {} entries available",
                    response.history.len()
                );
            };
            tracing::info!(query = %entry.query, "re-running search from history");
            let args = SearchArgs {
                query: entry.query.clone(),
                vendors: Vec::new(),
                open_all,
                assume_yes: yes,
            };
            run_search(client, config, args).await
        }
    }
}

pub(crate) fn render_history(entries: &[HistoryEntry], now: DateTime<Utc>) -> String {
    use std::fmt::Write;

    if entries.is_empty() {
        return "no searches yet\n".to_string();
    }
    let mut out = String::new();
    for (i, entry) in entries.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<40} {}",
            i + 1,
            entry.query,
            format_relative(entry.timestamp, now)
        );
    }
    out
}
