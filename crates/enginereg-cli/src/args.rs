//! Command-line arguments and their defaults.

use clap::{ArgAction, Parser};
use enginereg_core::{EngineRegError, RegistrationConfig, RegistryConfig, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Parser, Debug)]
#[command(name = "register-engine")]
#[command(about = "Engine registration helper: register a local engine build by UUID")]
#[command(version, disable_version_flag = true)]
pub struct Args {
    /// Print version and exit
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Cleanup engine registrations that are not valid anymore
    #[arg(short = 'c', long = "cleanup")]
    pub cleanup: bool,

    /// List engine registrations
    #[arg(short = 'l', long, conflicts_with = "cleanup")]
    pub list: bool,

    /// Print the listing as JSON
    #[arg(long, requires = "list")]
    pub json: bool,

    /// Overwrite the registration if the path is already registered (default)
    #[arg(short = 'f', long, overrides_with = "no_force")]
    pub force: bool,

    /// Fail instead of overwriting an existing registration
    #[arg(long = "no-force", overrides_with = "force")]
    pub no_force: bool,

    /// UUID used for registration; defaults to the first line of uuid.txt, then a built-in UUID
    #[arg(short = 'u', long = "uuid")]
    pub uuid: Option<String>,

    /// Engine path; defaults to the current directory
    #[arg(short = 'p', long)]
    pub path: Option<PathBuf>,

    /// Use a SQLite store file instead of the platform registry
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Report on the console only, never show a dialog
    #[arg(long)]
    pub no_dialog: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Effective force mode: explicit flags win, otherwise the configured default.
    pub fn force(&self) -> bool {
        resolve_force(self.force, self.no_force)
    }
}

pub fn resolve_force(force: bool, no_force: bool) -> bool {
    if no_force {
        false
    } else if force {
        true
    } else {
        RegistrationConfig::FORCE_BY_DEFAULT
    }
}

/// Pick the registration identifier.
///
/// Order: explicit argument, first non-empty line of `uuid.txt` in `dir`,
/// then the built-in default. An explicit argument that is blank is rejected.
pub fn resolve_identifier(explicit: Option<&str>, dir: &Path) -> Result<String> {
    if let Some(id) = explicit.map(str::trim) {
        if id.is_empty() {
            return Err(EngineRegError::validation("uuid", "identifier must not be empty"));
        }
        return Ok(id.to_string());
    }

    let uuid_file = dir.join(RegistryConfig::UUID_FILE_NAME);
    match std::fs::read_to_string(&uuid_file) {
        Ok(contents) => {
            if let Some(id) = contents.lines().next().map(str::trim).filter(|l| !l.is_empty()) {
                debug!("Using identifier from {}", uuid_file.display());
                return Ok(id.to_string());
            }
            warn!("{} is empty, using default identifier", uuid_file.display());
        }
        Err(e) => debug!("No identifier file {}: {}", uuid_file.display(), e),
    }

    Ok(RegistryConfig::DEFAULT_ENGINE_ID.to_string())
}

/// True if `id` is a UUID, with or without braces.
pub fn is_uuid_shaped(id: &str) -> bool {
    let bare = id
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(id);
    uuid::Uuid::try_parse(bare).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_force_defaults_to_config() {
        assert_eq!(resolve_force(false, false), RegistrationConfig::FORCE_BY_DEFAULT);
        assert!(resolve_force(true, false));
        assert!(!resolve_force(false, true));
    }

    #[test]
    fn test_last_force_flag_wins() {
        let args = Args::parse_from(["register-engine", "-f", "--no-force"]);
        assert!(!args.force());

        let args = Args::parse_from(["register-engine", "--no-force", "-f"]);
        assert!(args.force());
    }

    #[test]
    fn test_parse_short_flags() {
        let args = Args::parse_from(["register-engine", "-u", "E1", "-p", "/engines/a", "-d"]);
        assert_eq!(args.uuid.as_deref(), Some("E1"));
        assert_eq!(args.path, Some(PathBuf::from("/engines/a")));
        assert!(args.debug);
        assert!(!args.cleanup);
    }

    #[test]
    fn test_list_conflicts_with_cleanup() {
        assert!(Args::try_parse_from(["register-engine", "-c", "-l"]).is_err());
    }

    #[test]
    fn test_json_requires_list() {
        assert!(Args::try_parse_from(["register-engine", "--json"]).is_err());
        assert!(Args::try_parse_from(["register-engine", "-l", "--json"]).is_ok());
    }

    #[test]
    fn test_version_flag_is_lowercase_v() {
        let err = Args::try_parse_from(["register-engine", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_identifier_explicit_wins() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("uuid.txt"), "{FROM-FILE}\n").unwrap();

        assert_eq!(resolve_identifier(Some(" E1 "), temp_dir.path()).unwrap(), "E1");
    }

    #[test]
    fn test_identifier_blank_explicit_rejected() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("uuid.txt"), "{FROM-FILE}\n").unwrap();

        let err = resolve_identifier(Some("  "), temp_dir.path()).unwrap_err();
        assert!(matches!(err, EngineRegError::Validation { ref field, .. } if field == "uuid"));
        assert_eq!(err.exit_code(), EngineRegError::EXIT_OTHER);
    }

    #[test]
    fn test_identifier_from_uuid_file_first_line() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("uuid.txt"),
            "{11111111-2222-3333-4444-555555555555}\r\nsecond line\n",
        )
        .unwrap();

        assert_eq!(
            resolve_identifier(None, temp_dir.path()).unwrap(),
            "{11111111-2222-3333-4444-555555555555}"
        );
    }

    #[test]
    fn test_identifier_default_without_file() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(
            resolve_identifier(None, temp_dir.path()).unwrap(),
            RegistryConfig::DEFAULT_ENGINE_ID
        );
    }

    #[test]
    fn test_identifier_default_with_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("uuid.txt"), "\n").unwrap();

        assert_eq!(
            resolve_identifier(None, temp_dir.path()).unwrap(),
            RegistryConfig::DEFAULT_ENGINE_ID
        );
    }

    #[test]
    fn test_uuid_shape() {
        assert!(is_uuid_shaped(RegistryConfig::DEFAULT_ENGINE_ID));
        assert!(is_uuid_shaped("7f209ae1-0867-4b03-811d-243c9baf2e74"));
        assert!(!is_uuid_shaped("my-engine"));
        assert!(!is_uuid_shaped("{7F209AE1}"));
    }
}
