//! CSV export of the reconciled inventory

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::item::StartupItem;

/// Export the inventory to a CSV file with header `Name,Path,Status`
///
/// The path column is empty when the target is unknown. The parent
/// directory is created if it does not exist yet.
pub fn export_csv(items: &[StartupItem], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        message: format!("failed to create CSV file: {}", e),
    })?;

    writer
        .write_record(["Name", "Path", "Status"])
        .map_err(|e| csv_error(path, e))?;

    for item in items {
        writer
            .write_record([
                item.name.as_str(),
                item.target.as_str(),
                &item.status.to_string(),
            ])
            .map_err(|e| csv_error(path, e))?;
    }

    writer.flush().map_err(|e| Error::Persist {
        path: path.to_path_buf(),
        message: format!("CSV flush error: {}", e),
    })?;

    tracing::info!("Exported {} startup items to {}", items.len(), path.display());
    Ok(())
}

fn csv_error(path: &Path, e: csv::Error) -> Error {
    Error::Persist {
        path: path.to_path_buf(),
        message: format!("CSV write error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Scope, Source, Status};
    use tempfile::TempDir;

    fn item(name: &str, target: &str, status: Status) -> StartupItem {
        StartupItem {
            name: name.to_string(),
            target: target.to_string(),
            source: Source::RegistryRun,
            scope: Scope::User,
            status,
            records: Vec::new(),
        }
    }

    #[test]
    fn test_export_shape() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("exports").join("startup_items.csv");

        let items = vec![
            item("Updater", r"C:\Apps\updater.exe", Status::Enabled),
            item("OldTool", "", Status::Disabled),
        ];
        export_csv(&items, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Name,Path,Status");
        assert_eq!(lines[1], r"Updater,C:\Apps\updater.exe,Enabled");
        // Path column stays empty when the target is unknown
        assert_eq!(lines[2], "OldTool,,Disabled");
    }

    #[test]
    fn test_export_empty_inventory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("startup_items.csv");

        export_csv(&[], &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "Name,Path,Status");
    }
}
