// Storage path utilities.
// Maps persisted-state keys to files under the platform cache directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/orgdash on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgdash").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the JSON file holding `key` under `root`.
pub fn key_path(root: &Path, key: &str) -> PathBuf {
    root.join(format!("{}.json", sanitize_name(key)))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
