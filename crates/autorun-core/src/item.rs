//! Startup item data model
//!
//! A startup item is one logical entry that the OS launches at logon.
//! The same name can show up in several backing stores at once (a run-key
//! value and a disabled-folder entry, for example); each raw observation is
//! an [`ItemRecord`], and the reconciler folds records into one
//! [`StartupItem`] with a derived [`Status`].

use serde::{Deserialize, Serialize};

/// Which backing store a record was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Registry run key (active)
    RegistryRun,
    /// Registry MSConfig mirror key (disabled)
    RegistryDisabledMirror,
    /// Startup folder (active)
    StartupFolder,
    /// `Disabled` subfolder of the startup folder
    StartupFolderDisabled,
}

impl Source {
    /// Whether items in this store are launched at logon
    pub fn is_active(&self) -> bool {
        matches!(self, Source::RegistryRun | Source::StartupFolder)
    }

    /// The paired store of the opposite activation state
    ///
    /// Enabling/disabling an item is a move between a source and its
    /// counterpart; it is never a copy.
    pub fn counterpart(&self) -> Source {
        match self {
            Source::RegistryRun => Source::RegistryDisabledMirror,
            Source::RegistryDisabledMirror => Source::RegistryRun,
            Source::StartupFolder => Source::StartupFolderDisabled,
            Source::StartupFolderDisabled => Source::StartupFolder,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::RegistryRun => write!(f, "registry run key"),
            Source::RegistryDisabledMirror => write!(f, "registry disabled mirror"),
            Source::StartupFolder => write!(f, "startup folder"),
            Source::StartupFolderDisabled => write!(f, "disabled startup folder"),
        }
    }
}

/// Which hive/subkey variant supplied an entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Per-user entry (HKCU or the user's startup folder)
    #[default]
    User,
    /// Machine-wide entry, 64-bit registry view
    System64,
    /// Machine-wide entry, 32-bit (WOW64) registry view
    System32,
    /// Scope could not be determined
    Unknown,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::User => write!(f, "User"),
            Scope::System64 => write!(f, "System (64-bit)"),
            Scope::System32 => write!(f, "System (32-bit)"),
            Scope::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Derived activation status of a startup item
///
/// Never stored directly: Enabled iff the item's authoritative record lives
/// in an active store, Disabled iff it lives in a disabled store, Unknown
/// when the stores conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Enabled,
    Disabled,
    Unknown,
}

impl Status {
    /// Tier used by the inventory sort contract: Enabled first, then
    /// Disabled, then Unknown.
    pub(crate) fn sort_rank(&self) -> u8 {
        match self {
            Status::Enabled => 0,
            Status::Disabled => 1,
            Status::Unknown => 2,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Enabled => write!(f, "Enabled"),
            Status::Disabled => write!(f, "Disabled"),
            Status::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One raw observation from a single store adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    /// Value name (registry) or file name (folder)
    pub name: String,
    /// Command line or file path the OS would execute
    pub target: String,
    /// Store the record was read from
    pub source: Source,
    /// Hive/bitness variant that supplied it
    pub scope: Scope,
}

/// A reconciled startup item
#[derive(Debug, Clone)]
pub struct StartupItem {
    /// Item name, unique within the reconciled view (case-insensitive)
    pub name: String,
    /// Target of the authoritative record (empty if unknown)
    pub target: String,
    /// Store holding the authoritative record
    pub source: Source,
    /// Scope of the authoritative record
    pub scope: Scope,
    /// Derived status
    pub status: Status,
    /// Every record observed for this name, in adapter order
    ///
    /// More than one record with mixed activation states means the item is
    /// in conflict; all locations are kept for operator inspection.
    pub records: Vec<ItemRecord>,
}

impl StartupItem {
    /// Whether the backing stores disagree about this item
    pub fn is_conflict(&self) -> bool {
        self.status == Status::Unknown
            && self.records.iter().any(|r| r.source.is_active())
            && self.records.iter().any(|r| !r.source.is_active())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_counterpart_is_symmetric() {
        for source in [
            Source::RegistryRun,
            Source::RegistryDisabledMirror,
            Source::StartupFolder,
            Source::StartupFolderDisabled,
        ] {
            assert_eq!(source.counterpart().counterpart(), source);
            assert_ne!(source.counterpart().is_active(), source.is_active());
        }
    }

    #[test]
    fn test_status_sort_rank_order() {
        assert!(Status::Enabled.sort_rank() < Status::Disabled.sort_rank());
        assert!(Status::Disabled.sort_rank() < Status::Unknown.sort_rank());
    }
}
