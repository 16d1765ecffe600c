//! # autorun-core
//!
//! Core library for inventorying and managing Windows startup items across
//! their two backing stores: registry run keys and the startup folder.
//!
//! This crate provides the foundational functionality for:
//! - Enumerating startup items from every autostart source through a
//!   uniform store-adapter interface
//! - Reconciling those sources into one de-duplicated inventory with a
//!   derived Enabled/Disabled/Unknown status
//! - Enabling, disabling, deleting and adding items while keeping exactly
//!   one authoritative record per item across all stores
//! - Backing the inventory up to a JSON snapshot and replaying it
//!
//! ## Modules
//!
//! - [`backup`] - Snapshot persistence and restore reporting
//! - [`error`] - Error types and Result alias
//! - [`export`] - CSV export of the inventory
//! - [`item`] - Startup item data model
//! - [`manager`] - Item operations over the full adapter set
//! - [`protect`] - Denylist guard for critical system entries
//! - [`reconcile`] - Merging raw store records into the inventory
//! - [`settings`] - Persistent application settings
//! - [`store`] - Store adapters for each autostart source
//!
//! ## Example
//!
//! ```no_run
//! use autorun_core::{MemoryStore, Scope, Source, StartupManager};
//!
//! // On Windows, `StartupManager::system_default()` wires up the real
//! // registry and startup-folder stores instead.
//! let run_key = MemoryStore::new(Source::RegistryRun, Scope::User);
//! let manager = StartupManager::new(vec![Box::new(run_key)]);
//! for item in manager.inventory().expect("inventory") {
//!     println!("{} | {}", item.name, item.status);
//! }
//! ```

// Module declarations
pub mod backup;
pub mod error;
pub mod export;
pub mod item;
pub mod manager;
pub mod protect;
pub mod reconcile;
pub mod settings;
pub mod store;

// Re-export key types for convenience

// Error types
pub use error::{Error, Result};

// Data model
pub use item::{ItemRecord, Scope, Source, StartupItem, Status};

// Store adapters
pub use store::{FolderStore, MemoryStore, StoreAdapter};
#[cfg(windows)]
pub use store::RegistryStore;

// Item operations
pub use manager::StartupManager;

// Backup/restore
pub use backup::{BackupManager, RestoreFailure, RestoreReport, Snapshot, SnapshotRecord};

// CSV export
pub use export::export_csv;

// Settings
pub use settings::Settings;
