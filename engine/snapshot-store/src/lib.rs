//! # Snapshot Store
//!
//! Storage for the dated JSON snapshots produced by `league-scraper`.
//!
//! ## Layout
//!
//! ```text
//! <data_dir>/<kind>/<YYYY-MM-DD>.json   one snapshot per date
//! <data_dir>/<kind>/index.json          SnapshotIndex for the kind
//! ```
//!
//! The index is an explicit value: load it with [`SnapshotStore::load_index`],
//! record new dates on it, and hand it back with [`SnapshotStore::write_index`].

pub mod backend;
pub mod config;
pub mod error;
pub mod index;
pub mod local;

pub use backend::{InMemorySnapshotStore, LocalSnapshotStore, SnapshotStore};
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use index::SnapshotIndex;
pub use local::{create_local_store, create_local_store_with_config};
