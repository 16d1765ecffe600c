//! Guard for critical system startup entries
//!
//! A fixed denylist refused before any mutating operation. This is a hard
//! safety rail: a matching name is never enabled, disabled, deleted, added
//! or restored, even if the caller insists.

/// Name fragments of critical system entries, matched case-insensitively
const PROTECTED_FRAGMENTS: &[&str] = &[
    "svchost",
    "explorer",
    "spoolsv",
    "nvtray",
    "defender",
    "windows defender",
];

/// Whether a startup item name matches the protected denylist
///
/// Matching is a case-insensitive substring check, so `svchost.exe` and
/// `MySvchostHelper` both match.
pub fn is_protected(name: &str) -> bool {
    let lower = name.to_lowercase();
    PROTECTED_FRAGMENTS
        .iter()
        .any(|fragment| lower.contains(fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_substring_matches() {
        assert!(is_protected("svchost.exe"));
        assert!(is_protected("Windows Defender"));
        assert!(is_protected("explorer"));
        assert!(is_protected("MySvchostHelper"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_protected("SVCHOST.EXE"));
        assert!(is_protected("DeFeNdEr"));
    }

    #[test]
    fn test_ordinary_names_pass() {
        assert!(!is_protected("Spotify"));
        assert!(!is_protected("OneDrive"));
        assert!(!is_protected("Steam"));
    }
}
