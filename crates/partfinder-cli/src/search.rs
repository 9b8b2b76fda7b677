//! `search` and `open` command handlers.
//!
//! Both build a [`SearchOrchestrator`] over the backend client and the
//! system browser, run one search, and render the session.

use partfinder_client::PartfinderClient;
use partfinder_core::display::{format_price_range, parsed_summary};
use partfinder_core::AppConfig;
use partfinder_session::{
    BrowsingContextHost, OrchestratorOptions, SearchBackend, SearchOrchestrator, SearchPhase,
    SearchSession, SystemBrowser,
};

use crate::prompt::confirm;

#[derive(Debug)]
pub(crate) struct SearchArgs {
    pub(crate) query: String,
    pub(crate) vendors: Vec<String>,
    pub(crate) open_all: bool,
    pub(crate) assume_yes: bool,
}

pub(crate) fn build_orchestrator(
    client: PartfinderClient,
    config: &AppConfig,
    vendors: Vec<String>,
) -> SearchOrchestrator<PartfinderClient, SystemBrowser> {
    let mut options = OrchestratorOptions::from_config(config);
    if !vendors.is_empty() {
        options.vendors = Some(vendors);
    }
    SearchOrchestrator::new(client, SystemBrowser, options)
}

/// Run one search, print the results, and optionally open them all.
///
/// # Errors
///
/// Returns an error when the search ends in the error phase or stdin
/// cannot be read for a confirmation prompt.
pub(crate) async fn run_search(
    client: PartfinderClient,
    config: &AppConfig,
    args: SearchArgs,
) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(client, config, args.vendors);
    if !search_and_render(&orchestrator, &args.query).await? {
        return Ok(());
    }
    if args.open_all {
        open_all_and_advise(&orchestrator, args.assume_yes).await?;
    }
    Ok(())
}

/// Run one search, then open the result numbered `index` (1-based).
///
/// # Errors
///
/// Returns an error when the search fails, `index` is out of range, or the
/// result could not be opened.
pub(crate) async fn run_open(
    client: PartfinderClient,
    config: &AppConfig,
    query: &str,
    vendors: Vec<String>,
    index: usize,
) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(client, config, vendors);
    if !search_and_render(&orchestrator, query).await? {
        return Ok(());
    }

    let snapshot = orchestrator.snapshot();
    let results = snapshot.results().unwrap_or_default();
    let Some(result) = index.checked_sub(1).and_then(|i| results.get(i)) else {
        anyhow::bail!("no result #{index}; this search returned {} results", results.len());
    };
    if !result.is_ready() {
        anyhow::bail!("{} is still {}; try again shortly", result.vendor, result.status);
    }
    if !orchestrator.open_one(index - 1) {
        anyhow::bail!(
            "could not open {}; copy the link instead: {}",
            result.vendor,
            result.url
        );
    }
    println!("opened {}", result.vendor);
    Ok(())
}

/// Search for `query` and print the outcome.
///
/// Returns `Ok(false)` when the query was blank and nothing was sent.
pub(crate) async fn search_and_render<B, H>(
    orchestrator: &SearchOrchestrator<B, H>,
    query: &str,
) -> anyhow::Result<bool>
where
    B: SearchBackend,
    H: BrowsingContextHost,
{
    if query.trim().is_empty() {
        println!("enter a part query (brand, model, part description, or part number)");
        return Ok(false);
    }

    println!("Searching for \"{}\"...", query.trim());
    let phase = orchestrator.search(query).await;
    let snapshot = orchestrator.snapshot();

    if phase == SearchPhase::Error {
        anyhow::bail!(
            "{}",
            snapshot
                .error_message()
                .unwrap_or(partfinder_session::SEARCH_FAILED_MESSAGE)
        );
    }

    print!("{}", render_session(&snapshot));
    Ok(true)
}

/// Render parsed metadata and the result table of a session.
pub(crate) fn render_session(session: &SearchSession) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    if let Some(summary) = session.parsed().and_then(parsed_summary) {
        let _ = writeln!(out, "{summary}");
    }

    let results = session.results().unwrap_or_default();
    if results.is_empty() {
        let _ = writeln!(out, "no vendor results");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<4}{:<22}{:<10}{:<12}PRICE",
        "#", "VENDOR", "STATUS", "METHOD"
    );
    for (i, result) in results.iter().enumerate() {
        let price = result
            .pricing
            .as_ref()
            .map(format_price_range)
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<4}{:<22}{:<10}{:<12}{}",
            i + 1,
            result.vendor,
            result.status.to_string(),
            result.method,
            price
        );
        if result.is_ready() && !result.url.is_empty() {
            let _ = writeln!(out, "    {}", result.url);
        } else if let Some(eta) = &result.eta {
            let _ = writeln!(out, "    ready in ~{eta}");
        }
    }
    out
}

/// Open every ready result, then show recovery guidance on a shortfall.
async fn open_all_and_advise<B, H>(
    orchestrator: &SearchOrchestrator<B, H>,
    assume_yes: bool,
) -> anyhow::Result<()>
where
    B: SearchBackend,
    H: BrowsingContextHost,
{
    let Some(plan) = orchestrator.plan_open_all() else {
        return Ok(());
    };
    if plan.ready == 0 {
        println!("no results are ready to open yet");
        return Ok(());
    }
    if plan.requires_confirmation
        && !assume_yes
        && !confirm(&format!("Open {} tabs?", plan.ready))?
    {
        println!("nothing opened");
        return Ok(());
    }

    let Some(report) = orchestrator.open_all() else {
        return Ok(());
    };
    println!(
        "opened {} of {} tabs",
        report.outcome.opened, report.outcome.attempted
    );

    if let Some(scheduled) = report.recovery {
        orchestrator.settle_recovery(scheduled).await;
        if let Some(guidance) = orchestrator.advisor().guidance() {
            eprintln!("{guidance}");
            eprintln!("Use `partfinder open <query> --index N` to open a result on its own.");
        }
    }
    Ok(())
}
