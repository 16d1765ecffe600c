//! Store adapters: uniform access to one autostart source
//!
//! Every backing store (registry run key, registry disabled mirror, startup
//! folder, disabled subfolder) is reached through the [`StoreAdapter`]
//! trait. The reconciler and item operations only ever see this trait,
//! which is what keeps them testable without a real registry.

mod folder;
mod memory;
#[cfg(windows)]
mod registry;

pub use folder::FolderStore;
pub use memory::MemoryStore;
#[cfg(windows)]
pub use registry::RegistryStore;

use crate::error::{Error, Result};
use crate::item::{Scope, Source};

/// Uniform read/write access to one autostart source
///
/// Contract:
/// - `list` returns an empty sequence when the store location does not
///   exist; only permission or unexpected I/O failures are errors.
/// - `add` overwrites and is idempotent: re-adding the same name/target is
///   a no-op success.
/// - `remove` fails with [`Error::NotFound`] when the name is absent.
pub trait StoreAdapter {
    /// Which of the four source kinds this adapter serves
    fn source(&self) -> Source;

    /// Hive/bitness variant this adapter covers
    fn scope(&self) -> Scope;

    /// Enumerate all (name, target) entries in the store
    fn list(&self) -> Result<Vec<(String, String)>>;

    /// Write or overwrite an entry
    fn add(&self, name: &str, target: &str) -> Result<()>;

    /// Remove an entry, failing with `NotFound` if it is absent
    fn remove(&self, name: &str) -> Result<()>;

    /// Look up a single entry's target by name (case-insensitive)
    fn get(&self, name: &str) -> Result<Option<String>> {
        let wanted = name.to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .find(|(n, _)| n.to_lowercase() == wanted)
            .map(|(_, target)| target))
    }

    /// Atomically relocate one record into another store
    ///
    /// Reads the value from `self`, writes it to `other`, then removes it
    /// from `self`. If the remove fails, the write is rolled back (retried
    /// once) so the item is never left duplicated across two stores; an
    /// unrecoverable rollback is logged rather than silently losing the
    /// invariant.
    fn move_to(&self, other: &dyn StoreAdapter, name: &str) -> Result<()> {
        let target = self
            .get(name)?
            .ok_or_else(|| Error::NotFound(name.to_string()))?;

        other.add(name, &target)?;

        match self.remove(name) {
            Ok(()) => Ok(()),
            Err(remove_err) => {
                if let Err(first) = other.remove(name) {
                    // One retry before giving up on the rollback
                    if let Err(second) = other.remove(name) {
                        tracing::warn!(
                            "Rollback failed while moving '{}' from {} to {}: {} (retry: {}); \
                             item may now exist in both stores",
                            name,
                            self.source(),
                            other.source(),
                            first,
                            second
                        );
                    }
                }
                Err(remove_err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Scope, Source};
    use std::sync::Mutex;

    /// Adapter whose `remove` always fails, for exercising the rollback path
    struct StuckStore {
        inner: MemoryStore,
        removed: Mutex<Vec<String>>,
    }

    impl StuckStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(Source::RegistryRun, Scope::User),
                removed: Mutex::new(Vec::new()),
            }
        }
    }

    impl StoreAdapter for StuckStore {
        fn source(&self) -> Source {
            self.inner.source()
        }

        fn scope(&self) -> Scope {
            self.inner.scope()
        }

        fn list(&self) -> Result<Vec<(String, String)>> {
            self.inner.list()
        }

        fn add(&self, name: &str, target: &str) -> Result<()> {
            self.inner.add(name, target)
        }

        fn remove(&self, name: &str) -> Result<()> {
            self.removed.lock().unwrap().push(name.to_string());
            Err(Error::Store {
                name: name.to_string(),
                message: "remove refused".to_string(),
            })
        }
    }

    #[test]
    fn test_move_to_relocates_record() {
        let from = MemoryStore::new(Source::RegistryRun, Scope::User);
        let to = MemoryStore::new(Source::RegistryDisabledMirror, Scope::User);
        from.add("Updater", r"C:\Tools\updater.exe").unwrap();

        from.move_to(&to, "Updater").unwrap();

        assert!(from.get("Updater").unwrap().is_none());
        assert_eq!(
            to.get("Updater").unwrap().as_deref(),
            Some(r"C:\Tools\updater.exe")
        );
    }

    #[test]
    fn test_move_to_missing_name_is_not_found() {
        let from = MemoryStore::new(Source::RegistryRun, Scope::User);
        let to = MemoryStore::new(Source::RegistryDisabledMirror, Scope::User);

        let err = from.move_to(&to, "Ghost").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(to.get("Ghost").unwrap().is_none());
    }

    #[test]
    fn test_move_to_rolls_back_on_failed_remove() {
        let from = StuckStore::new();
        let to = MemoryStore::new(Source::RegistryDisabledMirror, Scope::User);
        from.inner.add("Updater", r"C:\Tools\updater.exe").unwrap();

        let err = from.move_to(&to, "Updater").unwrap_err();
        assert!(matches!(err, Error::Store { .. }));

        // The write into the destination was rolled back
        assert!(to.get("Updater").unwrap().is_none());
        // The source still holds the record
        assert!(from.get("Updater").unwrap().is_some());
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let store = MemoryStore::new(Source::RegistryRun, Scope::User);
        store.add("OneDrive", r"C:\OneDrive.exe").unwrap();

        assert_eq!(
            store.get("onedrive").unwrap().as_deref(),
            Some(r"C:\OneDrive.exe")
        );
    }
}
