use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use league_scraper::DataKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "league-tracker")]
#[command(about = "Scrape league standings and stat leaders into dated JSON snapshots")]
pub struct Cli {
    /// Config file (defaults to ./league-tracker.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scrape one data kind, or all of them, and save the snapshot
    Scrape {
        /// Only scrape this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Snapshot date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Replace an existing snapshot for the same date
        #[arg(short, long)]
        force: bool,
    },
    /// List saved snapshot dates, newest first
    Dates {
        #[arg(short, long, value_enum, default_value = "standings")]
        kind: KindArg,
    },
    /// Show how a team, player or goalie moved across saved snapshots
    History {
        #[arg(short, long, value_enum, default_value = "standings")]
        kind: KindArg,

        /// Team, player or goalie name (case-insensitive)
        name: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Standings,
    PlayerStats,
    GoalieStats,
}

impl From<KindArg> for DataKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Standings => DataKind::Standings,
            KindArg::PlayerStats => DataKind::PlayerStats,
            KindArg::GoalieStats => DataKind::GoalieStats,
        }
    }
}
