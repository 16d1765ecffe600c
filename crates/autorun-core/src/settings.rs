//! Application settings
//!
//! A small key/value configuration persisted as JSON. A missing settings
//! file is created with the documented defaults on first load.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Persistent application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Dark UI theme
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    /// Whether operations are logged to a file
    #[serde(default = "default_true")]
    pub logs_enabled: bool,
    /// Snapshot file location used by backup and restore
    #[serde(default = "default_backup_location")]
    pub backup_location: String,
}

fn default_true() -> bool {
    true
}

fn default_backup_location() -> String {
    "backup.json".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            logs_enabled: true,
            backup_location: default_backup_location(),
        }
    }
}

impl Settings {
    /// Default settings file location under the user config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("autorun").join("config.json"))
    }

    /// Load settings from `path`, creating the file with defaults when it
    /// does not exist yet
    ///
    /// Unreadable or unparsable content falls back to the defaults rather
    /// than failing; settings are never load-bearing for store state.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = settings.save(path) {
                tracing::warn!("Could not create settings file {}: {}", path.display(), e);
            }
            return settings;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Invalid settings file {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Could not read settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from the default location, falling back to defaults when no
    /// config directory is available
    pub fn load_default() -> Self {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Self::default(),
        }
    }

    /// Save settings to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.dark_mode);
        assert!(settings.logs_enabled);
        assert_eq!(settings.backup_location, "backup.json");
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");

        let settings = Settings::load(&path);
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");

        let settings = Settings {
            dark_mode: false,
            logs_enabled: true,
            backup_location: "backups/snapshot.json".to_string(),
        };
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_invalid_content_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();

        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_missing_keys() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"dark_mode": false}"#).unwrap();

        let settings = Settings::load(&path);
        assert!(!settings.dark_mode);
        assert!(settings.logs_enabled);
        assert_eq!(settings.backup_location, "backup.json");
    }
}
