//! API key resolution.
//!
//! Checked-in configuration files carry a placeholder instead of a real key.
//! When the placeholder is present the key is read from the single `*.key`
//! file in a local directory that stays out of version control.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Value that marks a configured key as "read it from the key directory".
pub const PLACEHOLDER_KEY: &str = "yourkeyhere";

/// Return `configured` unless it is the placeholder, in which case read the
/// key file from `key_dir`.
///
/// Zero or several candidate files resolve to an empty key; the resulting
/// unauthenticated request then fails through the normal fetch path.
pub fn resolve_api_key(configured: &str, key_dir: &Path) -> String {
    if !configured.eq_ignore_ascii_case(PLACEHOLDER_KEY) {
        return configured.to_string();
    }

    let candidates = key_files(key_dir);
    match candidates.as_slice() {
        [only] => match fs::read_to_string(only) {
            Ok(key) => key.trim().to_string(),
            Err(e) => {
                warn!(path = %only.display(), error = %e, "key file unreadable");
                String::new()
            }
        },
        _ => {
            debug!(
                dir = %key_dir.display(),
                candidates = candidates.len(),
                "no unique key file"
            );
            String::new()
        }
    }
}

fn key_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "key"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_key_is_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("owm.key"), "from-file").unwrap();
        assert_eq!(resolve_api_key("abc123", dir.path()), "abc123");
    }

    #[test]
    fn placeholder_reads_single_key_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("owm.key"), "secret-key\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        assert_eq!(resolve_api_key("YourKeyHere", dir.path()), "secret-key");
    }

    #[test]
    fn placeholder_without_key_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_api_key(PLACEHOLDER_KEY, dir.path()), "");
    }

    #[test]
    fn placeholder_with_two_key_files_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.key"), "one").unwrap();
        fs::write(dir.path().join("b.key"), "two").unwrap();
        assert_eq!(resolve_api_key(PLACEHOLDER_KEY, dir.path()), "");
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            resolve_api_key(PLACEHOLDER_KEY, &dir.path().join("nope")),
            ""
        );
    }
}
