//! Engine Registry Core - register local engine builds for discovery by UUID.
//!
//! Other tools look up installed engine builds by identifier in a per-user
//! registry. This crate validates an engine directory, writes or removes the
//! `identifier -> path` registration, and cleans out registrations whose
//! directories are gone.
//!
//! # Example
//!
//! ```rust,ignore
//! use enginereg_core::{open_platform_store, EngineRegistrar};
//! use std::path::Path;
//!
//! fn main() -> enginereg_core::Result<()> {
//!     let registrar = EngineRegistrar::new(open_platform_store);
//!
//!     let registration = registrar.register(
//!         "{7F209AE1-0867-4B03-811D-243C9BAF2E74}",
//!         Path::new("/opt/UnrealEngine"),
//!         true,
//!     )?;
//!     println!("{} -> {}", registration.id, registration.path);
//!
//!     let report = registrar.cleanup()?;
//!     println!("Removed {} stale registrations", report.removed.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod notify;
pub mod platform;
pub mod registry;

// Re-export commonly used types
pub use config::{AppConfig, EngineLayoutConfig, RegistrationConfig, RegistryConfig};
pub use error::{EngineRegError, Result};
pub use layout::{is_valid_engine_path, missing_engine_dirs};
pub use notify::{default_notifier, ConsoleNotifier, Notifier, RecordingNotifier};
pub use registry::{
    open_platform_store, CleanupReport, EngineRegistrar, MemoryStore, Registration,
    RegistryEntry, RegistryStore, SqliteStore,
};
