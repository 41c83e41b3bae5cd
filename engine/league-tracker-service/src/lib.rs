//! League Tracker Service Library
//!
//! Configuration, logging and the scrape/query runs behind the
//! `league-tracker` binary.

pub mod cli;
pub mod config;
pub mod history;
pub mod logging;
pub mod runner;

pub use config::{load_config, LoggingConfig, ServiceConfig};
pub use history::{build_series, render_series, HistoryColumns, HistoryPoint};
pub use logging::initialize_logging;
pub use runner::{render_index, ScrapeOutcome, ScrapeReport, Tracker};
