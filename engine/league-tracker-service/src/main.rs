//! League Tracker
//!
//! Scrapes the league's standings and stat leaders into dated JSON snapshots
//! and answers questions about what has been saved.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use league_scraper::{DataKind, HttpPageSource};
use league_tracker_service::cli::{Cli, Command};
use league_tracker_service::{initialize_logging, load_config, render_index, ScrapeReport, Tracker};
use snapshot_store::create_local_store_with_config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    initialize_logging(&config.logging)?;

    info!("Starting League Tracker v{}", env!("CARGO_PKG_VERSION"));

    let source = HttpPageSource::new(&config.scraper)?;
    let store = create_local_store_with_config(config.store.clone())?;
    info!("Storing snapshots under {:?}", store.data_dir());
    let tracker = Tracker::new(source, config.scraper.divisions.clone(), store);

    match cli.command {
        Command::Scrape { kind, date, force } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());

            match kind {
                Some(kind) => print_report(&tracker.scrape_kind(kind.into(), date, force).await?),
                None => {
                    let outcome = tracker.scrape_all(date, force).await;
                    for report in &outcome.reports {
                        print_report(report);
                    }
                    outcome.into_result()?;
                }
            }
        }
        Command::Dates { kind } => {
            let kind = DataKind::from(kind);
            let index = tracker.dates(kind).await?;
            print!("{}", render_index(kind, &index));
        }
        Command::History { kind, name } => {
            print!("{}", tracker.history(kind.into(), &name).await?);
        }
    }

    Ok(())
}

fn print_report(report: &ScrapeReport) {
    println!("{} {}: {} records saved", report.kind, report.date, report.records);
    for drift in &report.drift {
        println!("  {drift}");
    }
}
