//! In-memory store adapter
//!
//! Backs tests and fixtures; also useful as a scratch store when previewing
//! operations without touching the registry or filesystem.

use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::item::{Scope, Source};
use crate::store::StoreAdapter;

/// A store adapter over an in-memory list of (name, target) entries
///
/// Name comparison is case-insensitive, matching registry value-name
/// semantics. Entries keep insertion order so listings are deterministic.
pub struct MemoryStore {
    source: Source,
    scope: Scope,
    entries: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    /// Create an empty store for the given source kind and scope
    pub fn new(source: Source, scope: Scope) -> Self {
        Self {
            source,
            scope,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<I, N, T>(source: Source, scope: Scope, entries: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let store = Self::new(source, scope);
        {
            let mut guard = store.lock_entries();
            for (name, target) in entries {
                guard.push((name.into(), target.into()));
            }
        }
        store
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_entries(&self) -> MutexGuard<'_, Vec<(String, String)>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl StoreAdapter for MemoryStore {
    fn source(&self) -> Source {
        self.source
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn list(&self) -> Result<Vec<(String, String)>> {
        Ok(self.lock_entries().clone())
    }

    fn add(&self, name: &str, target: &str) -> Result<()> {
        let wanted = name.to_lowercase();
        let mut entries = self.lock_entries();
        if let Some(existing) = entries
            .iter_mut()
            .find(|(n, _)| n.to_lowercase() == wanted)
        {
            existing.1 = target.to_string();
        } else {
            entries.push((name.to_string(), target.to_string()));
        }
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let wanted = name.to_lowercase();
        let mut entries = self.lock_entries();
        let before = entries.len();
        entries.retain(|(n, _)| n.to_lowercase() != wanted);
        if entries.len() == before {
            return Err(Error::NotFound(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let store = MemoryStore::new(Source::RegistryRun, Scope::User);
        store.add("App", "app.exe").unwrap();
        store.add("App", "app.exe").unwrap();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_add_overwrites_case_insensitively() {
        let store = MemoryStore::new(Source::RegistryRun, Scope::User);
        store.add("App", "old.exe").unwrap();
        store.add("APP", "new.exe").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("app").unwrap().as_deref(), Some("new.exe"));
    }

    #[test]
    fn test_name_matching_is_not_ascii_only() {
        let store = MemoryStore::new(Source::RegistryRun, Scope::User);
        store.add("Яндекс", "yandex.exe").unwrap();

        assert!(store.get("яндекс").unwrap().is_some());
        store.remove("ЯНДЕКС").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let store = MemoryStore::new(Source::RegistryRun, Scope::User);
        assert!(matches!(
            store.remove("Nothing").unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
