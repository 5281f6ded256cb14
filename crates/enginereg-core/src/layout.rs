//! Engine installation layout checks.
//!
//! An engine root is valid when it contains an `engine` directory holding
//! `Binaries`, `Build`, `Config` and `Content`. Names are matched
//! ASCII-case-insensitively so a stock `Engine/` tree validates on
//! case-sensitive filesystems the same way it does on Windows.

use crate::config::EngineLayoutConfig;
use crate::platform::normcase;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check if a path is the root of an engine installation.
///
/// Read-only; returns false for missing paths instead of erroring.
pub fn is_valid_engine_path(path: &Path) -> bool {
    let missing = missing_engine_dirs(path);
    if !missing.is_empty() {
        debug!(
            "Engine path {} is missing: {:?}",
            path.display(),
            missing
        );
    }
    missing.is_empty()
}

/// List the required directories absent under `path`, in check order.
///
/// A missing root yields just the root; a missing `engine` directory yields
/// just that directory, since nothing below it can exist.
pub fn missing_engine_dirs(path: &Path) -> Vec<PathBuf> {
    let root = PathBuf::from(normcase(&path.to_string_lossy()));
    if !root.exists() {
        return vec![root];
    }

    let Some(engine_dir) = find_child_dir(&root, EngineLayoutConfig::ENGINE_DIR_NAME) else {
        return vec![root.join(EngineLayoutConfig::ENGINE_DIR_NAME)];
    };

    EngineLayoutConfig::REQUIRED_SUBDIRS
        .iter()
        .filter(|name| find_child_dir(&engine_dir, name).is_none())
        .map(|name| engine_dir.join(name))
        .collect()
}

/// Locate a child directory by name, falling back to a case-insensitive scan.
fn find_child_dir(parent: &Path, name: &str) -> Option<PathBuf> {
    let exact = parent.join(name);
    if exact.is_dir() {
        return Some(exact);
    }

    std::fs::read_dir(parent)
        .ok()?
        .filter_map(|entry| entry.ok())
        .find(|entry| {
            entry.file_name().to_string_lossy().eq_ignore_ascii_case(name)
                && entry.path().is_dir()
        })
        .map(|entry| entry.path())
}
