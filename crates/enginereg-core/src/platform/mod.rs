//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific path behavior live here rather than
//! scattered through the registry code.
//!
//! - `paths` - per-user store locations and path case normalization

pub mod paths;

pub use paths::{
    clean_path, normalize_engine_path, normalize_stored_path, normcase, registry_db_path,
};

/// Returns the current platform name.
pub fn current_platform() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "linux"
    }
    #[cfg(target_os = "windows")]
    {
        "windows"
    }
    #[cfg(target_os = "macos")]
    {
        "macos"
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        "unknown"
    }
}
