//! Item operations over the full adapter set
//!
//! [`StartupManager`] owns every store adapter and is the only way callers
//! mutate startup state. Enabling and disabling are moves between a store
//! and its counterpart, never copies, so a logical item keeps exactly one
//! authoritative record across all stores. A single mutex serializes every
//! read-inventory/mutate-store sequence; operations are short, bounded
//! local I/O, so one coarse lock is sufficient.

use std::path::Path;
use std::sync::Mutex;

use crate::backup::{BackupManager, RestoreFailure, RestoreReport, Snapshot, SnapshotRecord};
use crate::error::{Error, Result};
use crate::item::{ItemRecord, Scope, Source, StartupItem, Status};
use crate::protect::is_protected;
use crate::reconcile;
use crate::store::StoreAdapter;

enum RecordOutcome {
    Applied,
    Skipped,
}

/// Manages startup items across all configured store adapters
pub struct StartupManager {
    adapters: Vec<Box<dyn StoreAdapter>>,
    /// Serializes read/mutate sequences, including the periodic re-poll
    guard: Mutex<()>,
}

impl StartupManager {
    /// Create a manager over an explicit adapter set
    pub fn new(adapters: Vec<Box<dyn StoreAdapter>>) -> Self {
        Self {
            adapters,
            guard: Mutex::new(()),
        }
    }

    /// Manager over the real OS stores: the three run keys, their disabled
    /// mirrors, and the user's startup folder with its `Disabled` subfolder
    #[cfg(windows)]
    pub fn system_default() -> Result<Self> {
        use crate::store::{FolderStore, RegistryStore};

        let startup_dir = dirs::config_dir()
            .ok_or_else(|| Error::StoreUnavailable("config directory not found".to_string()))?
            .join(r"Microsoft\Windows\Start Menu\Programs\Startup");

        Ok(Self::new(vec![
            Box::new(RegistryStore::user_run()),
            Box::new(RegistryStore::system_run_64()),
            Box::new(RegistryStore::system_run_32()),
            Box::new(RegistryStore::user_disabled()),
            Box::new(RegistryStore::system_disabled_64()),
            Box::new(RegistryStore::system_disabled_32()),
            Box::new(FolderStore::active(&startup_dir)),
            Box::new(FolderStore::disabled(&startup_dir)),
        ]))
    }

    /// The reconciled, de-duplicated inventory in sort-contract order
    ///
    /// Callers must re-read the inventory after any mutating call; the
    /// manager does not push change notifications.
    pub fn inventory(&self) -> Result<Vec<StartupItem>> {
        let _guard = self.lock();
        Ok(reconcile::reconcile(self.collect_records()?))
    }

    /// Look up one item by name (case-insensitive)
    pub fn find(&self, name: &str) -> Result<StartupItem> {
        let _guard = self.lock();
        reconcile::find(self.collect_records()?, name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Enable an item by moving its records into the matching active stores
    ///
    /// A no-op success when already enabled. Fails with `Ambiguous` when the
    /// stores conflict; the caller must resolve that manually first.
    pub fn enable(&self, name: &str) -> Result<()> {
        let result = self.set_state(name, true);
        log_outcome("enable", name, &result);
        result
    }

    /// Disable an item by moving its records into the disabled stores
    ///
    /// Never deletes the underlying record; disabling is always reversible.
    pub fn disable(&self, name: &str) -> Result<()> {
        let result = self.set_state(name, false);
        log_outcome("disable", name, &result);
        result
    }

    /// Permanently remove an item from whichever stores hold it
    ///
    /// Irreversible, unlike [`disable`](Self::disable). Refused with
    /// `Ambiguous` when the stores conflict.
    pub fn delete(&self, name: &str) -> Result<()> {
        let result = self.delete_inner(name);
        log_outcome("delete", name, &result);
        result
    }

    /// Create a new enabled item in the active registry store for `scope`
    ///
    /// Fails with `AlreadyExists` if the name is present anywhere (active or
    /// disabled) within that scope, to avoid creating a conflicting
    /// duplicate.
    pub fn add(&self, name: &str, target: &str, scope: Scope) -> Result<()> {
        let result = self.add_inner(name, target, scope);
        log_outcome("add", name, &result);
        result
    }

    /// Capture the current inventory into a snapshot file
    ///
    /// Overwrites any prior snapshot at `path`. Store state is never
    /// touched.
    pub fn backup_to(&self, path: impl AsRef<Path>) -> Result<Snapshot> {
        let _guard = self.lock();
        let items = reconcile::reconcile(self.collect_records()?);
        let snapshot = Snapshot::from_items(&items);
        BackupManager::new(path).save(&snapshot)?;
        Ok(snapshot)
    }

    /// Load a snapshot file and replay it into the stores
    pub fn restore_from(&self, path: impl AsRef<Path>) -> Result<RestoreReport> {
        let snapshot = BackupManager::new(path).load()?;
        Ok(self.apply_snapshot(&snapshot))
    }

    /// Replay a snapshot: ensure each record is present in the store its
    /// status calls for
    ///
    /// Additive and repairing, never destructive: items present in the
    /// current state but absent from the snapshot are left alone, and a
    /// record already present in the right store is skipped. Failing
    /// records do not abort the run; failures are collected per record.
    pub fn apply_snapshot(&self, snapshot: &Snapshot) -> RestoreReport {
        let _guard = self.lock();
        let mut report = RestoreReport::default();

        for record in &snapshot.records {
            match self.apply_record(record) {
                Ok(RecordOutcome::Applied) => report.applied += 1,
                Ok(RecordOutcome::Skipped) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(
                        action = "restore",
                        item = %record.name,
                        error = %e,
                        "snapshot record not applied"
                    );
                    report.failures.push(RestoreFailure {
                        name: record.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            action = "restore",
            applied = report.applied,
            skipped = report.skipped,
            failed = report.failures.len(),
            "snapshot applied"
        );
        report
    }

    fn set_state(&self, name: &str, enable: bool) -> Result<()> {
        if is_protected(name) {
            return Err(Error::Protected(name.to_string()));
        }

        let _guard = self.lock();
        let records = self.records_for(name)?;
        if records.is_empty() {
            return Err(Error::NotFound(name.to_string()));
        }

        let has_active = records.iter().any(|r| r.source.is_active());
        let has_disabled = records.iter().any(|r| !r.source.is_active());
        if has_active && has_disabled {
            return Err(Error::Ambiguous(name.to_string()));
        }

        // Already in the desired state: idempotent no-op success
        if (enable && has_active) || (!enable && has_disabled) {
            return Ok(());
        }

        // Move every record so no store is left holding a stale copy. A
        // failed move undoes the moves already made, otherwise the item
        // would end up split across an active and a disabled store.
        let mut moved: Vec<&ItemRecord> = Vec::new();
        for record in &records {
            let from = self.adapter_for(record.source, record.scope)?;
            let to = self.adapter_for(record.source.counterpart(), record.scope)?;
            if let Err(e) = from.move_to(to, &record.name) {
                self.undo_moves(&moved);
                return Err(e);
            }
            moved.push(record);
        }
        Ok(())
    }

    /// Move previously relocated records back where they came from
    fn undo_moves(&self, moved: &[&ItemRecord]) {
        for record in moved.iter().rev() {
            let undone = self
                .adapter_for(record.source.counterpart(), record.scope)
                .and_then(|from| {
                    let to = self.adapter_for(record.source, record.scope)?;
                    from.move_to(to, &record.name)
                });
            if let Err(e) = undone {
                tracing::warn!(
                    item = %record.name,
                    error = %e,
                    "could not undo a partial state change; item may be split across stores"
                );
            }
        }
    }

    fn delete_inner(&self, name: &str) -> Result<()> {
        if is_protected(name) {
            return Err(Error::Protected(name.to_string()));
        }

        let _guard = self.lock();
        let records = self.records_for(name)?;
        if records.is_empty() {
            return Err(Error::NotFound(name.to_string()));
        }

        let has_active = records.iter().any(|r| r.source.is_active());
        let has_disabled = records.iter().any(|r| !r.source.is_active());
        if has_active && has_disabled {
            // No single authoritative record to delete
            return Err(Error::Ambiguous(name.to_string()));
        }

        for record in &records {
            self.adapter_for(record.source, record.scope)?
                .remove(&record.name)?;
        }
        Ok(())
    }

    fn add_inner(&self, name: &str, target: &str, scope: Scope) -> Result<()> {
        if is_protected(name) {
            return Err(Error::Protected(name.to_string()));
        }

        let _guard = self.lock();
        for adapter in self.adapters.iter().filter(|a| a.scope() == scope) {
            if adapter.get(name)?.is_some() {
                return Err(Error::AlreadyExists(name.to_string()));
            }
        }

        self.adapter_for(Source::RegistryRun, scope)?.add(name, target)
    }

    fn apply_record(&self, record: &SnapshotRecord) -> Result<RecordOutcome> {
        // A conflicted record has no single desired state to replay
        if record.status == Status::Unknown {
            return Ok(RecordOutcome::Skipped);
        }
        if is_protected(&record.name) {
            return Err(Error::Protected(record.name.clone()));
        }

        let scope = record.scope.unwrap_or_default();
        let base = record.source.unwrap_or(Source::RegistryRun);
        let desired = match record.status {
            Status::Enabled if base.is_active() => base,
            Status::Enabled => base.counterpart(),
            Status::Disabled if base.is_active() => base.counterpart(),
            Status::Disabled => base,
            Status::Unknown => unreachable!("handled above"),
        };

        let adapter = self.adapter_for(desired, scope)?;
        if adapter.get(&record.name)?.is_some() {
            // Present already (matching target or not): left as-is
            return Ok(RecordOutcome::Skipped);
        }

        // If the counterpart store holds the record, repair by moving it
        // rather than adding a conflicting duplicate.
        if let Ok(counterpart) = self.adapter_for(desired.counterpart(), scope) {
            if counterpart.get(&record.name)?.is_some() {
                counterpart.move_to(adapter, &record.name)?;
                return Ok(RecordOutcome::Applied);
            }
        }

        if record.target.is_empty() {
            return Err(Error::Store {
                name: record.name.clone(),
                message: "legacy record has no target to recreate".to_string(),
            });
        }

        adapter.add(&record.name, &record.target)?;
        Ok(RecordOutcome::Applied)
    }

    /// List every adapter, tagging entries with their source and scope
    fn collect_records(&self) -> Result<Vec<ItemRecord>> {
        let mut records = Vec::new();
        for adapter in &self.adapters {
            let entries = adapter.list()?;
            records.extend(entries.into_iter().map(|(name, target)| ItemRecord {
                name,
                target,
                source: adapter.source(),
                scope: adapter.scope(),
            }));
        }
        Ok(records)
    }

    fn records_for(&self, name: &str) -> Result<Vec<ItemRecord>> {
        // Same case policy as the reconciler: a name `find` resolves must
        // also be reachable by the mutating operations
        let wanted = name.to_lowercase();
        Ok(self
            .collect_records()?
            .into_iter()
            .filter(|r| r.name.to_lowercase() == wanted)
            .collect())
    }

    fn adapter_for(&self, source: Source, scope: Scope) -> Result<&dyn StoreAdapter> {
        self.adapters
            .iter()
            .find(|a| a.source() == source && a.scope() == scope)
            .map(|a| a.as_ref())
            .ok_or_else(|| {
                Error::StoreUnavailable(format!("no {} store configured for scope {}", source, scope))
            })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.guard.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn log_outcome(action: &str, name: &str, result: &Result<()>) {
    match result {
        Ok(()) => tracing::info!(action, item = name, "startup item operation completed"),
        Err(e) => tracing::warn!(action, item = name, error = %e, "startup item operation failed"),
    }
}
