//! Reconciliation of raw store records into one consistent inventory
//!
//! Records from every store adapter are grouped by name and folded into a
//! single de-duplicated view with a derived status. Grouping is
//! case-insensitive on purpose: registry value names are case-insensitive,
//! so `Updater` in a run key and `updater` in the disabled mirror are the
//! same logical item.
//!
//! The output ordering is a documented contract, not incidental: Enabled
//! items first, then Disabled, then Unknown, alphabetically
//! (case-insensitive) within each tier.

use std::collections::HashMap;

use crate::item::{ItemRecord, StartupItem, Status};

/// Fold raw records from all adapters into the reconciled inventory
pub fn reconcile(records: Vec<ItemRecord>) -> Vec<StartupItem> {
    // Group case-insensitively, preserving first-seen order so folding is
    // deterministic across runs.
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<ItemRecord>> = HashMap::new();
    for record in records {
        let key = record.name.to_lowercase();
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(record);
    }

    let mut items: Vec<StartupItem> = order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .map(fold_group)
        .collect();

    items.sort_by(|a, b| {
        (a.status.sort_rank(), a.name.to_lowercase())
            .cmp(&(b.status.sort_rank(), b.name.to_lowercase()))
    });
    items
}

/// Reconcile and look up a single item by name (case-insensitive)
pub fn find(records: Vec<ItemRecord>, name: &str) -> Option<StartupItem> {
    let wanted = name.to_lowercase();
    reconcile(records)
        .into_iter()
        .find(|item| item.name.to_lowercase() == wanted)
}

/// Fold one name group into a reconciled item
///
/// An item present in both an active and a disabled store is a conflict:
/// status becomes `Unknown` and every location is retained for operator
/// inspection. Conflicts are surfaced, never auto-resolved.
fn fold_group(records: Vec<ItemRecord>) -> StartupItem {
    debug_assert!(!records.is_empty());

    let has_active = records.iter().any(|r| r.source.is_active());
    let has_disabled = records.iter().any(|r| !r.source.is_active());

    let status = match (has_active, has_disabled) {
        (true, true) => Status::Unknown,
        (true, false) => Status::Enabled,
        (false, true) => Status::Disabled,
        (false, false) => Status::Unknown,
    };

    // The authoritative record: first in adapter order, preferring the
    // active side on conflict since that is what the OS would launch.
    let primary = records
        .iter()
        .find(|r| r.source.is_active())
        .or_else(|| records.first())
        .cloned()
        .expect("group is non-empty");

    StartupItem {
        name: primary.name,
        target: primary.target,
        source: primary.source,
        scope: primary.scope,
        status,
        records,
    }
}
