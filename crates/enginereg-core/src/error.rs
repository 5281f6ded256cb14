//! Error types for the engine registry.
//!
//! Business-rule failures (invalid engine path, identifier collision) are kept
//! apart from store failures so the CLI can report and exit on each kind
//! distinctly.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for engine registration.
#[derive(Debug, Error)]
pub enum EngineRegError {
    // Registration rules
    #[error("Engine path is not valid: {}", path.display())]
    InvalidEnginePath { path: PathBuf },

    #[error("Engine has already been registered: {id} -> {existing}")]
    AlreadyRegistered { id: String, existing: String },

    // Store errors
    #[error("Registry store access failed for {namespace}: {message}")]
    StoreAccess {
        namespace: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<rusqlite::Error>,
    },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },
}

/// Result type alias for engine registry operations.
pub type Result<T> = std::result::Result<T, EngineRegError>;

impl From<rusqlite::Error> for EngineRegError {
    fn from(err: rusqlite::Error) -> Self {
        EngineRegError::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl EngineRegError {
    /// Exit code used when the process fails with an invalid engine path.
    pub const EXIT_INVALID_PATH: u8 = 2;
    /// Exit code used when an unforced registration collides.
    pub const EXIT_ALREADY_REGISTERED: u8 = 3;
    /// Exit code used when the registry store cannot be opened or accessed.
    pub const EXIT_STORE_ACCESS: u8 = 4;
    /// Exit code for everything else.
    pub const EXIT_OTHER: u8 = 1;

    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        EngineRegError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a validation error for a named input.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineRegError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a store access error for a namespace.
    pub fn store_access(
        namespace: impl Into<String>,
        message: impl Into<String>,
        source: Option<std::io::Error>,
    ) -> Self {
        EngineRegError::StoreAccess {
            namespace: namespace.into(),
            message: message.into(),
            source,
        }
    }

    /// True for failures of the backing store rather than of the request.
    pub fn is_store_access(&self) -> bool {
        matches!(
            self,
            EngineRegError::StoreAccess { .. } | EngineRegError::Database { .. }
        )
    }

    /// Map the error kind to a process exit code.
    ///
    /// - `2`: engine path failed validation
    /// - `3`: identifier already registered (unforced)
    /// - `4`: registry store could not be opened or accessed
    /// - `1`: anything else
    pub fn exit_code(&self) -> u8 {
        match self {
            EngineRegError::InvalidEnginePath { .. } => Self::EXIT_INVALID_PATH,
            EngineRegError::AlreadyRegistered { .. } => Self::EXIT_ALREADY_REGISTERED,
            EngineRegError::StoreAccess { .. } | EngineRegError::Database { .. } => {
                Self::EXIT_STORE_ACCESS
            }
            _ => Self::EXIT_OTHER,
        }
    }
}
