//! Platform-specific path utilities.
//!
//! This module provides:
//! - Path case normalization matching the host filesystem's rules
//! - The per-user location of the file-backed registry store

use crate::config::RegistryConfig;
use crate::error::{EngineRegError, Result};
use std::path::{Component, Path, PathBuf};

/// Normalize the case and separators of a path.
///
/// # Platform Behavior
/// - **Windows**: lowercases and converts `/` to `\` (paths compare case-insensitively)
/// - **Linux/macOS**: returns the path unchanged
pub fn normcase(path: &str) -> String {
    #[cfg(windows)]
    {
        path.replace('/', "\\").to_lowercase()
    }

    #[cfg(not(windows))]
    {
        path.to_string()
    }
}

/// Produce the string form under which an engine path is stored.
///
/// The path is made absolute against the working directory (without resolving
/// symlinks or adding verbatim prefixes), cleaned lexically and then
/// case-normalized.
pub fn normalize_engine_path(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path).map_err(|e| EngineRegError::io_with_path(e, path))?;
    Ok(normcase(&clean_path(&absolute).to_string_lossy()))
}

/// Normalize a path string read back from a store for comparison with
/// [`normalize_engine_path`] output.
pub fn normalize_stored_path(value: &str) -> String {
    normcase(&clean_path(Path::new(value)).to_string_lossy())
}

/// Collapse `.` and `..` components and drop trailing separators.
///
/// Purely lexical: symlinks are not resolved, and `..` at the root stays at
/// the root.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                // Relative paths keep leading `..` components.
                None | Some(Component::ParentDir) | Some(Component::CurDir) => {
                    cleaned.push(component);
                }
            },
            other => cleaned.push(other),
        }
    }
    cleaned
}

/// Get the per-user configuration directory for file-backed stores.
///
/// # Platform Behavior
/// - **Linux**: `~/.config/enginereg` (XDG_CONFIG_HOME)
/// - **Windows**: `%APPDATA%\enginereg`
/// - **macOS**: `~/Library/Application Support/enginereg`
pub fn app_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| EngineRegError::Config {
        message: "Could not determine platform config directory".to_string(),
    })?;
    Ok(config_dir.join(RegistryConfig::APP_CONFIG_DIR_NAME))
}

/// Get the path to the file-backed registry database.
///
/// Returns `{app_config_dir}/registry.db`.
pub fn registry_db_path() -> Result<PathBuf> {
    Ok(app_config_dir()?.join(RegistryConfig::DB_FILENAME))
}
