//! League standings and stat-leader scraper
//!
//! Fetches the league's standings and per-division stats pages, finds the
//! right tables, and decodes their rows into dated [`Snapshot`]s.

pub mod config;
pub mod decode;
pub mod drift;
pub mod extract;
pub mod orchestrator;
pub mod records;
pub mod source;
pub mod types;

pub use config::{DivisionTarget, ScraperConfig};
pub use decode::{decode_rows, StatRecord};
pub use drift::{check_standings_drift, DivisionDrift};
pub use extract::{extract_rows, extract_tables, RawCell, RawRow, TableSelection};
pub use orchestrator::DivisionOrchestrator;
pub use records::{GoalieStats, PlayerStats, TeamStanding};
pub use source::{HttpPageSource, PageRequest, PageSource, StaticPageSource};
pub use types::{DataKind, Division, PageLayout, Snapshot, StatType};
