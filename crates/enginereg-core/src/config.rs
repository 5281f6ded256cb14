//! Centralized configuration for the engine registry.
//!
//! Store locations, the engine directory contract and registration defaults
//! live here as associated constants.

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Engine Registration Helper";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
}

/// Where registrations are stored.
pub struct RegistryConfig;

impl RegistryConfig {
    /// Registry key (under the current user hive) holding engine builds.
    /// Also used as the namespace name in file-backed stores.
    pub const KEY_PATH: &'static str = r"SOFTWARE\Epic Games\Unreal Engine\Builds";
    /// Identifier used when neither `--uuid` nor a uuid file is given.
    pub const DEFAULT_ENGINE_ID: &'static str = "{7F209AE1-0867-4B03-811D-243C9BAF2E74}";
    /// File in the working directory whose first line overrides the default identifier.
    pub const UUID_FILE_NAME: &'static str = "uuid.txt";
    /// Directory under the platform config dir for file-backed stores.
    pub const APP_CONFIG_DIR_NAME: &'static str = "enginereg";
    pub const DB_FILENAME: &'static str = "registry.db";
    pub const BUSY_TIMEOUT_MS: u64 = 5000;
}

/// Registration behavior defaults.
pub struct RegistrationConfig;

impl RegistrationConfig {
    /// The original helper forced every registration regardless of flags.
    /// Kept as the default; `--no-force` opts out.
    pub const FORCE_BY_DEFAULT: bool = true;
}

/// Directory layout an engine installation must have.
pub struct EngineLayoutConfig;

impl EngineLayoutConfig {
    pub const ENGINE_DIR_NAME: &'static str = "engine";
    pub const REQUIRED_SUBDIRS: [&'static str; 4] = ["Binaries", "Build", "Config", "Content"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_id_is_braced_uuid() {
        let id = RegistryConfig::DEFAULT_ENGINE_ID;
        assert!(id.starts_with('{') && id.ends_with('}'));
        assert_eq!(id.len(), 38);
    }

    #[test]
    fn test_key_path_ends_with_builds() {
        assert!(RegistryConfig::KEY_PATH.ends_with(r"\Builds"));
    }
}
