//! Startup folder store adapter
//!
//! A startup-folder item is a plain file: the file name is the item name
//! and the file's own path is the target the OS executes. Disabling a
//! folder item moves the file into a `Disabled` subfolder; it is never
//! deleted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::item::{Scope, Source};
use crate::store::StoreAdapter;

/// Store adapter over a startup folder or its `Disabled` subfolder
pub struct FolderStore {
    dir: PathBuf,
    source: Source,
    /// The disabled subfolder is created lazily on first write; the active
    /// folder is expected to exist already.
    lazily_create: bool,
}

impl FolderStore {
    /// Adapter over the active startup folder
    pub fn active(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            source: Source::StartupFolder,
            lazily_create: false,
        }
    }

    /// Adapter over the `Disabled` subfolder of a startup folder
    pub fn disabled(startup_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: startup_dir.as_ref().join("Disabled"),
            source: Source::StartupFolderDisabled,
            lazily_create: true,
        }
    }

    /// Directory this adapter reads and writes
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn store_error(&self, name: &str, err: impl std::fmt::Display) -> Error {
        Error::Store {
            name: name.to_string(),
            message: format!("{} ({})", err, self.dir.display()),
        }
    }
}

impl StoreAdapter for FolderStore {
    fn source(&self) -> Source {
        self.source
    }

    fn scope(&self) -> Scope {
        // Startup folders are always per-user here (the all-users folder is
        // not managed).
        Scope::User
    }

    fn list(&self) -> Result<Vec<(String, String)>> {
        if !self.dir.exists() {
            // A missing folder is an empty store, not a failure
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir)
            .map_err(|e| Error::StoreUnavailable(format!("{}: {}", self.dir.display(), e)))?;

        let mut items = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| Error::StoreUnavailable(format!("{}: {}", self.dir.display(), e)))?;
            let path = entry.path();
            // Subdirectories (including `Disabled`) belong to other adapters
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                items.push((name.to_string(), path.display().to_string()));
            }
        }
        items.sort_by(|(a, _), (b, _)| a.to_lowercase().cmp(&b.to_lowercase()));
        Ok(items)
    }

    fn add(&self, name: &str, target: &str) -> Result<()> {
        let dest = self.entry_path(name);
        let source_path = Path::new(target);

        // Re-adding a file that already lives here is a no-op success
        if dest.exists() && (source_path == dest || !source_path.exists()) {
            return Ok(());
        }

        if !source_path.exists() {
            return Err(self.store_error(name, "target file does not exist"));
        }

        if !self.dir.exists() {
            if !self.lazily_create {
                return Err(Error::StoreUnavailable(format!(
                    "startup folder missing: {}",
                    self.dir.display()
                )));
            }
            fs::create_dir_all(&self.dir).map_err(|e| self.store_error(name, e))?;
        }

        fs::copy(source_path, &dest).map_err(|e| self.store_error(name, e))?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.entry_path(name);
        if !path.exists() {
            return Err(Error::NotFound(name.to_string()));
        }
        fs::remove_file(&path).map_err(|e| self.store_error(name, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).expect("create file");
        writeln!(file, "launcher stub").expect("write file");
        path
    }

    #[test]
    fn test_missing_folder_lists_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FolderStore::active(tmp.path().join("does-not-exist"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_skips_subdirectories() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tool.lnk");
        fs::create_dir(tmp.path().join("Disabled")).unwrap();

        let store = FolderStore::active(tmp.path());
        let items = store.list().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].0, "tool.lnk");
    }

    #[test]
    fn test_disabled_store_creates_dir_on_first_write() {
        let tmp = TempDir::new().unwrap();
        let src = write_file(tmp.path(), "tool.lnk");

        let store = FolderStore::disabled(tmp.path());
        assert!(!store.dir().exists());

        store.add("tool.lnk", &src.display().to_string()).unwrap();
        assert!(store.dir().exists());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_move_between_active_and_disabled() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "tool.lnk");

        let active = FolderStore::active(tmp.path());
        let disabled = FolderStore::disabled(tmp.path());

        active.move_to(&disabled, "tool.lnk").unwrap();
        assert!(active.list().unwrap().is_empty());
        assert_eq!(disabled.list().unwrap().len(), 1);

        // And back again: disabling must stay reversible
        disabled.move_to(&active, "tool.lnk").unwrap();
        assert_eq!(active.list().unwrap().len(), 1);
        assert!(disabled.list().unwrap().is_empty());
    }

    #[test]
    fn test_readd_existing_file_is_noop() {
        let tmp = TempDir::new().unwrap();
        let path = write_file(tmp.path(), "tool.lnk");

        let store = FolderStore::active(tmp.path());
        store.add("tool.lnk", &path.display().to_string()).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = FolderStore::active(tmp.path());
        assert!(matches!(
            store.remove("ghost.lnk").unwrap_err(),
            Error::NotFound(_)
        ));
    }
}
