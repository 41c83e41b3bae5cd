//! Snapshot store trait and implementations

use crate::config::StoreConfig;
use crate::error::{Result, StoreError};
use crate::index::SnapshotIndex;
use chrono::NaiveDate;
use league_scraper::{DataKind, Snapshot};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Storage for dated snapshots and the per-kind index
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the index for a data kind, or an empty one if none was written yet
    async fn load_index(&self, kind: DataKind) -> Result<SnapshotIndex>;

    /// Replace the stored index for a data kind
    async fn write_index(&self, kind: DataKind, index: &SnapshotIndex) -> Result<()>;

    /// Save a snapshot under its date.
    ///
    /// An existing snapshot for the same date is only replaced when `force` is set.
    async fn save_snapshot<R>(&self, kind: DataKind, snapshot: &Snapshot<R>, force: bool) -> Result<()>
    where
        R: Serialize + Sync;

    /// Load the snapshot for a date, if one exists
    async fn load_snapshot<R>(&self, kind: DataKind, date: NaiveDate) -> Result<Option<Snapshot<R>>>
    where
        R: DeserializeOwned + Send;

    /// Load every indexed snapshot, oldest first
    async fn load_history<R>(&self, kind: DataKind) -> Result<Vec<Snapshot<R>>>
    where
        R: DeserializeOwned + Send,
    {
        let index = self.load_index(kind).await?;
        let mut snapshots = Vec::with_capacity(index.dates.len());

        for date in index.dates.iter().rev() {
            match self.load_snapshot::<R>(kind, *date).await? {
                Some(snapshot) => snapshots.push(snapshot),
                None => warn!("Index lists {} {} but the snapshot is missing", kind, date),
            }
        }

        Ok(snapshots)
    }
}

/// Local file-based snapshot store
pub struct LocalSnapshotStore {
    config: StoreConfig,
}

impl LocalSnapshotStore {
    /// Create a new local snapshot store
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate().map_err(StoreError::config)?;
        Ok(Self { config })
    }

    /// Create a new local snapshot store with default config
    pub fn with_default_config(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(StoreConfig::new(data_dir))
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.config.data_dir
    }

    fn to_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        Ok(bytes)
    }

    /// Write through a temporary sibling so readers never see a half-written file
    async fn write_file(&self, path: &Path, bytes: Vec<u8>) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, path).await?;

        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[async_trait::async_trait]
impl SnapshotStore for LocalSnapshotStore {
    async fn load_index(&self, kind: DataKind) -> Result<SnapshotIndex> {
        let path = self.config.index_path(kind);

        match self.read_file(&path).await? {
            Some(content) => {
                let mut index: SnapshotIndex = serde_json::from_str(&content)?;
                index.normalize();
                debug!("Loaded {} index with {} dates", kind, index.dates.len());
                Ok(index)
            }
            None => {
                info!("No {} index at {:?}, starting a new one", kind, path);
                Ok(SnapshotIndex::new())
            }
        }
    }

    async fn write_index(&self, kind: DataKind, index: &SnapshotIndex) -> Result<()> {
        let bytes = self.to_json(index)?;
        self.write_file(&self.config.index_path(kind), bytes).await
    }

    async fn save_snapshot<R>(&self, kind: DataKind, snapshot: &Snapshot<R>, force: bool) -> Result<()>
    where
        R: Serialize + Sync,
    {
        let path = self.config.snapshot_path(kind, snapshot.date);

        if !force && tokio::fs::metadata(&path).await.is_ok() {
            return Err(StoreError::already_exists(format!(
                "{} snapshot for {} at {:?}",
                kind, snapshot.date, path
            )));
        }

        let bytes = self.to_json(snapshot)?;
        self.write_file(&path, bytes).await?;

        info!("Saved {} records to {:?}", snapshot.total_records(), path);
        Ok(())
    }

    async fn load_snapshot<R>(&self, kind: DataKind, date: NaiveDate) -> Result<Option<Snapshot<R>>>
    where
        R: DeserializeOwned + Send,
    {
        let path = self.config.snapshot_path(kind, date);

        match self.read_file(&path).await? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }
}

/// In-memory snapshot store (for testing)
#[derive(Default, Clone)]
pub struct InMemorySnapshotStore {
    snapshots: Arc<Mutex<HashMap<(DataKind, NaiveDate), serde_json::Value>>>,
    indexes: Arc<Mutex<HashMap<DataKind, SnapshotIndex>>>,
}

impl InMemorySnapshotStore {
    /// Create a new in-memory snapshot store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots across all kinds
    pub async fn snapshot_count(&self) -> usize {
        self.snapshots.lock().await.len()
    }
}

#[async_trait::async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load_index(&self, kind: DataKind) -> Result<SnapshotIndex> {
        Ok(self.indexes.lock().await.get(&kind).cloned().unwrap_or_default())
    }

    async fn write_index(&self, kind: DataKind, index: &SnapshotIndex) -> Result<()> {
        self.indexes.lock().await.insert(kind, index.clone());
        Ok(())
    }

    async fn save_snapshot<R>(&self, kind: DataKind, snapshot: &Snapshot<R>, force: bool) -> Result<()>
    where
        R: Serialize + Sync,
    {
        let value = serde_json::to_value(snapshot)?;
        let mut snapshots = self.snapshots.lock().await;

        let key = (kind, snapshot.date);
        if !force && snapshots.contains_key(&key) {
            return Err(StoreError::already_exists(format!("{} snapshot for {}", kind, snapshot.date)));
        }

        snapshots.insert(key, value);
        Ok(())
    }

    async fn load_snapshot<R>(&self, kind: DataKind, date: NaiveDate) -> Result<Option<Snapshot<R>>>
    where
        R: DeserializeOwned + Send,
    {
        let snapshots = self.snapshots.lock().await;

        match snapshots.get(&(kind, date)) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }
}
