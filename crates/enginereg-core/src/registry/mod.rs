//! Per-user engine build registry.
//!
//! Registrations are flat `identifier -> engine path` string pairs kept in a
//! persistent namespace that other tools read to discover installed engines.
//!
//! # Backends
//!
//! - **Windows**: `HKEY_CURRENT_USER\SOFTWARE\Epic Games\Unreal Engine\Builds`
//! - **Linux/macOS**: a SQLite file under the platform config directory, see
//!   [`crate::platform::registry_db_path`]
//! - **Tests/embedding**: [`MemoryStore`]

pub mod memory;
pub mod registrar;
pub mod sqlite;
pub mod store;
#[cfg(windows)]
pub mod windows;

pub use memory::MemoryStore;
pub use registrar::{CleanupReport, EngineRegistrar, Registration};
pub use sqlite::SqliteStore;
pub use store::{Entries, RegistryEntry, RegistryStore};
#[cfg(windows)]
pub use windows::WindowsRegistryStore;

use crate::error::Result;

/// Open the default store for the current platform.
///
/// Creates the namespace if it does not exist yet.
pub fn open_platform_store() -> Result<Box<dyn RegistryStore>> {
    #[cfg(windows)]
    {
        Ok(Box::new(WindowsRegistryStore::open()?))
    }

    #[cfg(not(windows))]
    {
        Ok(Box::new(SqliteStore::open()?))
    }
}
