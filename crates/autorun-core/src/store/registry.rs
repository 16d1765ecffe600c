//! Windows registry store adapters
//!
//! Active items live in the `Run` key; disabled items live in the MSConfig
//! `startupreg` mirror key. Machine-wide 32-bit entries are reached through
//! the WOW64 32-bit registry view rather than a literal `Wow6432Node` path.

use winreg::enums::{
    HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE, KEY_READ, KEY_WOW64_32KEY, KEY_WOW64_64KEY, KEY_WRITE,
};
use winreg::types::FromRegValue;
use winreg::{RegKey, HKEY};

use crate::error::{Error, Result};
use crate::item::{Scope, Source};
use crate::store::StoreAdapter;

const RUN_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Run";
const DISABLED_KEY: &str = r"Software\Microsoft\Shared Tools\MSConfig\startupreg";

/// Store adapter over one registry key (run key or disabled mirror)
pub struct RegistryStore {
    hive: HKEY,
    path: &'static str,
    /// WOW64 view flag, 0 for the default view
    view: u32,
    source: Source,
    scope: Scope,
}

impl RegistryStore {
    /// Per-user run key (HKCU)
    pub fn user_run() -> Self {
        Self {
            hive: HKEY_CURRENT_USER,
            path: RUN_KEY,
            view: 0,
            source: Source::RegistryRun,
            scope: Scope::User,
        }
    }

    /// Machine-wide run key, 64-bit view (HKLM)
    pub fn system_run_64() -> Self {
        Self {
            hive: HKEY_LOCAL_MACHINE,
            path: RUN_KEY,
            view: KEY_WOW64_64KEY,
            source: Source::RegistryRun,
            scope: Scope::System64,
        }
    }

    /// Machine-wide run key, 32-bit view (HKLM, Wow6432Node)
    pub fn system_run_32() -> Self {
        Self {
            hive: HKEY_LOCAL_MACHINE,
            path: RUN_KEY,
            view: KEY_WOW64_32KEY,
            source: Source::RegistryRun,
            scope: Scope::System32,
        }
    }

    /// Per-user disabled mirror key (HKCU)
    pub fn user_disabled() -> Self {
        Self {
            hive: HKEY_CURRENT_USER,
            path: DISABLED_KEY,
            view: 0,
            source: Source::RegistryDisabledMirror,
            scope: Scope::User,
        }
    }

    /// Machine-wide disabled mirror key, 64-bit view (HKLM)
    pub fn system_disabled_64() -> Self {
        Self {
            hive: HKEY_LOCAL_MACHINE,
            path: DISABLED_KEY,
            view: KEY_WOW64_64KEY,
            source: Source::RegistryDisabledMirror,
            scope: Scope::System64,
        }
    }

    /// Machine-wide disabled mirror key, 32-bit view (HKLM)
    pub fn system_disabled_32() -> Self {
        Self {
            hive: HKEY_LOCAL_MACHINE,
            path: DISABLED_KEY,
            view: KEY_WOW64_32KEY,
            source: Source::RegistryDisabledMirror,
            scope: Scope::System32,
        }
    }

    fn open(&self, access: u32) -> std::io::Result<RegKey> {
        RegKey::predef(self.hive).open_subkey_with_flags(self.path, access | self.view)
    }

    fn unavailable(&self, err: std::io::Error) -> Error {
        Error::StoreUnavailable(format!("{} ({}): {}", self.path, self.scope, err))
    }
}

impl StoreAdapter for RegistryStore {
    fn source(&self) -> Source {
        self.source
    }

    fn scope(&self) -> Scope {
        self.scope
    }

    fn list(&self) -> Result<Vec<(String, String)>> {
        let key = match self.open(KEY_READ) {
            Ok(key) => key,
            // A missing key is an empty store, not a failure
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.unavailable(e)),
        };

        let mut items = Vec::new();
        for value in key.enum_values() {
            let (name, data) = value.map_err(|e| self.unavailable(e))?;
            // Skip the key's default value and non-string data
            if name.is_empty() {
                continue;
            }
            if let Ok(target) = String::from_reg_value(&data) {
                items.push((name, target));
            }
        }
        Ok(items)
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        let key = match self.open(KEY_READ) {
            Ok(key) => key,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.unavailable(e)),
        };

        match key.get_value::<String, _>(name) {
            Ok(target) => Ok(Some(target)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.unavailable(e)),
        }
    }

    fn add(&self, name: &str, target: &str) -> Result<()> {
        // The disabled mirror key may not exist yet; create_subkey opens an
        // existing key unchanged, so this stays idempotent.
        let (key, _) = RegKey::predef(self.hive)
            .create_subkey_with_flags(self.path, KEY_READ | KEY_WRITE | self.view)
            .map_err(|e| self.unavailable(e))?;

        key.set_value(name, &target.to_string()).map_err(|e| Error::Store {
            name: name.to_string(),
            message: format!("{} ({}): {}", self.path, self.scope, e),
        })
    }

    fn remove(&self, name: &str) -> Result<()> {
        let key = match self.open(KEY_READ | KEY_WRITE) {
            Ok(key) => key,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::NotFound(name.to_string()))
            }
            Err(e) => return Err(self.unavailable(e)),
        };

        match key.delete_value(name) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(name.to_string()))
            }
            Err(e) => Err(Error::Store {
                name: name.to_string(),
                message: format!("{} ({}): {}", self.path, self.scope, e),
            }),
        }
    }
}
