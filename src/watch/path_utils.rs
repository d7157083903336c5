// src/watch/path_utils.rs

//! Utility functions for displaying watched paths.

use std::path::Path;

use crate::watch::resolve::normalize_path;

/// Path of `path` relative to `root`, with forward slashes.
///
/// Both sides are normalized first. When `path` lives outside `root` the
/// result climbs out with `..` components, so it is always usable for
/// display. Identical paths yield an empty string.
pub fn relative_to_root(root: &Path, path: &Path) -> String {
    let root = normalize_path(root);
    let path = normalize_path(path);

    // Fast path: event path already starts with our root.
    if let Some(rest) = path.strip_prefix(root.trim_end_matches('/')) {
        if rest.is_empty() {
            return String::new();
        }
        if let Some(rest) = rest.strip_prefix('/') {
            return rest.to_string();
        }
    }

    let root_parts: Vec<&str> = root.split('/').filter(|p| !p.is_empty()).collect();
    let path_parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();

    let common = root_parts
        .iter()
        .zip(path_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out: Vec<&str> = vec![".."; root_parts.len() - common];
    out.extend_from_slice(&path_parts[common..]);
    out.join("/")
}
