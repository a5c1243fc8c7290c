//! Command handlers for the CLI.
//!
//! Each handler runs one client operation and prints the result as pretty
//! JSON on stdout. Logs go to stderr so the output stays pipeable.

use anyhow::Context;
use serde::Serialize;

use bizlookup_dataforseo::{
    classify_location, CancellationToken, DataForSeoClient, ReviewSort, TaskOutcome,
};

use crate::Commands;

/// Runs a command that talks to the provider.
pub(crate) async fn dispatch(client: &DataForSeoClient, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Search {
            name,
            location,
            limit,
        } => {
            let results = client.search_businesses(&name, &location, limit).await?;
            tracing::info!(count = results.len(), "search complete");
            print_json(&results)
        }
        Commands::Raw {
            name,
            location,
            limit,
        } => {
            let outcome = client.search_raw(&name, &location, limit).await?;
            report_outcome(&outcome)
        }
        Commands::Reviews {
            cid,
            location,
            depth,
            sort_by,
        } => run_reviews(client, &cid, &location, depth, sort_by).await,
        Commands::Balance => {
            let balance = client.balance().await?;
            print_json(&balance)
        }
        Commands::Classify { .. } => dispatch_offline(command),
    }
}

/// Runs a command that needs no credentials.
pub(crate) fn dispatch_offline(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Classify { location } => print_json(&classify_location(&location)),
        other => anyhow::bail!("command requires API credentials: {other:?}"),
    }
}

async fn run_reviews(
    client: &DataForSeoClient,
    cid: &str,
    location: &str,
    depth: u32,
    sort_by: ReviewSort,
) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received; cancelling reviews polling");
            on_interrupt.cancel();
        }
    });

    let result = client
        .fetch_reviews_with_cancel(cid, location, depth, sort_by, &cancel)
        .await;
    watcher.abort();

    report_outcome(&result?)
}

/// Prints the outcome as JSON. A business-level failure still prints, then
/// exits non-zero with the provider's status.
fn report_outcome<T: Serialize>(outcome: &TaskOutcome<T>) -> anyhow::Result<()> {
    print_json(outcome)?;
    if outcome.results.is_none() {
        anyhow::bail!(
            "lookup returned no results (status {}: {})",
            outcome
                .meta
                .status_code
                .map_or_else(|| "none".to_string(), |c| c.to_string()),
            outcome.meta.status_message.as_deref().unwrap_or("no message"),
        );
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}
