//! Configuration for the snapshot store

use chrono::NaiveDate;
use league_scraper::DataKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the snapshot store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base directory; each data kind gets a subdirectory
    pub data_dir: PathBuf,

    /// Pretty-print JSON files
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("./data"), pretty: true }
    }
}

impl StoreConfig {
    /// Create a new configuration with custom data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Default::default() }
    }

    /// Directory holding one data kind's snapshots and index
    pub fn kind_dir(&self, kind: DataKind) -> PathBuf {
        self.data_dir.join(kind.dir_name())
    }

    /// `<data_dir>/<kind>/<YYYY-MM-DD>.json`
    pub fn snapshot_path(&self, kind: DataKind, date: NaiveDate) -> PathBuf {
        self.kind_dir(kind).join(format!("{}.json", date.format("%Y-%m-%d")))
    }

    /// `<data_dir>/<kind>/index.json`
    pub fn index_path(&self, kind: DataKind) -> PathBuf {
        self.kind_dir(kind).join("index.json")
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }

        Ok(())
    }
}
