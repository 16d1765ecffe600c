//! Snapshot persistence for backup and restore
//!
//! A snapshot is a flat JSON array of records, one file, overwritten on
//! every backup (no history chain). Records carry name, target and status;
//! source and scope ride along so a restore can route each record to the
//! right store, but readers tolerate their absence as well as a missing
//! target (legacy records), per the documented file format.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::{Scope, Source, StartupItem, Status};

/// One persisted startup item record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub name: String,
    /// Command line or file path; empty for legacy records without one
    #[serde(default, alias = "target_or_path")]
    pub target: String,
    pub status: Status,
    /// Store the record was observed in, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// Scope of the record, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<Scope>,
}

/// A full reconciled inventory captured at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub records: Vec<SnapshotRecord>,
}

impl Snapshot {
    /// Capture a snapshot from a reconciled inventory
    pub fn from_items(items: &[StartupItem]) -> Self {
        Self {
            records: items
                .iter()
                .map(|item| SnapshotRecord {
                    name: item.name.clone(),
                    target: item.target.clone(),
                    status: item.status,
                    source: Some(item.source),
                    scope: Some(item.scope),
                })
                .collect(),
        }
    }

    /// Number of records in the snapshot
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the snapshot holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of applying a snapshot, collected per record
///
/// A failing record does not abort the restore; remaining records are still
/// processed and the failures reported as a batch.
#[derive(Debug, Clone, Default)]
pub struct RestoreReport {
    /// Records added to a store
    pub applied: usize,
    /// Records already present (or with no determinable state) left as-is
    pub skipped: usize,
    /// Records that could not be applied
    pub failures: Vec<RestoreFailure>,
}

impl RestoreReport {
    /// Total number of records processed
    pub fn total(&self) -> usize {
        self.applied + self.skipped + self.failures.len()
    }

    /// Whether every record applied or was already in place
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A single record that failed to restore
#[derive(Debug, Clone)]
pub struct RestoreFailure {
    pub name: String,
    pub message: String,
}

/// Reads and writes the snapshot file
pub struct BackupManager {
    path: PathBuf,
}

impl BackupManager {
    /// Create a manager for the given snapshot location
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Snapshot file location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a snapshot, overwriting any prior one
    ///
    /// Store state is never touched; only the snapshot file changes.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::Persist {
                    path: self.path.clone(),
                    message: e.to_string(),
                })?;
            }
        }

        let content = serde_json::to_string_pretty(snapshot).map_err(|e| Error::Persist {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        fs::write(&self.path, content).map_err(|e| Error::Persist {
            path: self.path.clone(),
            message: e.to_string(),
        })?;

        tracing::info!("Saved snapshot with {} records to {}", snapshot.len(), self.path.display());
        Ok(())
    }

    /// Load the snapshot from disk
    pub fn load(&self) -> Result<Snapshot> {
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| Error::CorruptSnapshot {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let manager = BackupManager::new(tmp.path().join("backup.json"));

        let snapshot = Snapshot {
            records: vec![SnapshotRecord {
                name: "Updater".to_string(),
                target: r"C:\Apps\updater.exe".to_string(),
                status: Status::Enabled,
                source: Some(Source::RegistryRun),
                scope: Some(Scope::User),
            }],
        };

        manager.save(&snapshot).unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.records[0].name, "Updater");
        assert_eq!(loaded.records[0].status, Status::Enabled);
    }

    #[test]
    fn test_empty_snapshot_is_a_valid_array() {
        let tmp = TempDir::new().unwrap();
        let manager = BackupManager::new(tmp.path().join("backup.json"));

        manager.save(&Snapshot::default()).unwrap();

        let content = fs::read_to_string(manager.path()).unwrap();
        assert_eq!(content.trim(), "[]");
        assert!(manager.load().unwrap().is_empty());
    }

    #[test]
    fn test_legacy_record_without_target_parses() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("backup.json");
        fs::write(&path, r#"[{"name": "OldTool", "status": "Disabled"}]"#).unwrap();

        let snapshot = BackupManager::new(&path).load().unwrap();
        assert_eq!(snapshot.records[0].name, "OldTool");
        assert_eq!(snapshot.records[0].target, "");
        assert!(snapshot.records[0].source.is_none());
    }

    #[test]
    fn test_unparsable_content_is_corrupt_snapshot() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("backup.json");
        fs::write(&path, "not json at all").unwrap();

        let err = BackupManager::new(&path).load().unwrap_err();
        assert!(matches!(err, Error::CorruptSnapshot { .. }));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let manager = BackupManager::new(tmp.path().join("backups").join("backup.json"));

        manager.save(&Snapshot::default()).unwrap();
        assert!(manager.path().exists());
    }
}
