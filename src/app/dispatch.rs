use crate::cli::{Cli, Commands, GlobalArgs};
use crate::config::{Config, ConfigOverrides};
use crate::store::{ElasticsearchStore, SnapshotStore};
use crate::ui::{prompt, style as ui};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use tracing::info;

use super::proposal::Proposal;
use super::thinner::{ApplyReport, Thinner};

pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(global.config.as_deref()).context("Failed to load config")?;
    config.apply_overrides(ConfigOverrides {
        endpoint: global.endpoint.clone(),
        repository_name: global.repository.clone(),
        name_prefix: global.prefix.clone(),
    });
    config.validate().context("Invalid config")?;
    Ok(config)
}

pub async fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(&cli.global)?;
    let store = ElasticsearchStore::from_config(&config)?;
    info!(
        "Using repository {} at {}",
        store.repository(),
        config.endpoint
    );
    let thinner = Thinner::new(store, config.namer(), config.retention_policy()?);

    match cli.command {
        Commands::Plan { now } => {
            let proposal = thinner.compute_proposal(resolve_now(now)).await?;
            print_proposal(&proposal);
            Ok(())
        }
        Commands::Thin { now, yes } => run_thin(&thinner, resolve_now(now), yes).await,
    }
}

async fn run_thin<S: SnapshotStore>(
    thinner: &Thinner<S>,
    now: NaiveDateTime,
    assume_yes: bool,
) -> Result<()> {
    let proposal = thinner.compute_proposal(now).await?;

    if proposal.is_noop() {
        println!("No snapshots found to delete... Goodbye!");
        return Ok(());
    }

    print_proposal(&proposal);

    if !assume_yes && !prompt::confirm("Does this seem reasonable?")? {
        println!("Nothing deleted.");
        return Ok(());
    }

    let report = thinner.apply_proposal(&proposal).await?;
    print_report(&report);
    Ok(())
}

fn resolve_now(now: Option<NaiveDateTime>) -> NaiveDateTime {
    now.unwrap_or_else(|| Local::now().naive_local())
}

fn print_proposal(proposal: &Proposal) {
    println!(
        "{}",
        ui::header(format!(
            "Proposing to keep {} snapshots (green) and delete {} (red):",
            proposal.keep.len(),
            proposal.delete.len()
        ))
    );
    for line in proposal.render() {
        println!("  {line}");
    }
    println!();
}

fn print_report(report: &ApplyReport) {
    println!(
        "{} Deleted {} snapshots",
        ui::success("✓"),
        report.deleted
    );
    if report.already_absent > 0 {
        println!(
            "  {}",
            ui::yellow(format!("{} were already gone", report.already_absent))
        );
    }
    if let Some(cleanup) = report.cleanup {
        println!(
            "  {}",
            ui::dim(format!(
                "Cleanup freed {} bytes in {} blobs",
                cleanup.deleted_bytes, cleanup.deleted_blobs
            ))
        );
    }
}
