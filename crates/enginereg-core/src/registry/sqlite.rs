//! SQLite-backed registry store.
//!
//! Used as the platform store where there is no system registry, and anywhere
//! a portable store file is wanted (`--store <FILE>`). Several namespaces can
//! share one database file.

use super::store::{Entries, RegistryEntry, RegistryStore};
use crate::config::RegistryConfig;
use crate::error::{EngineRegError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// File-backed [`RegistryStore`].
///
/// Uses WAL mode for safe access across processes and `Arc<Mutex<Connection>>`
/// for thread safety within a process. [`RegistryStore::entries`] returns a
/// snapshot of the namespace, so writes made while iterating are not seen.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    db_path: PathBuf,
    namespace: String,
}

impl SqliteStore {
    /// Open the store at the default per-user location.
    ///
    /// Creates the database and parent directories if they don't exist.
    pub fn open() -> Result<Self> {
        let db_path = crate::platform::registry_db_path()?;
        Self::open_at(&db_path)
    }

    /// Open the builds namespace in a specific database file.
    pub fn open_at(db_path: &Path) -> Result<Self> {
        Self::open_namespace(db_path, RegistryConfig::KEY_PATH)
    }

    /// Open an arbitrary namespace in a specific database file.
    ///
    /// Failures to create the file or its schema are reported as store
    /// access errors.
    pub fn open_namespace(db_path: &Path, namespace: &str) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    EngineRegError::store_access(
                        namespace,
                        format!("Failed to create store directory: {}", parent.display()),
                        Some(e),
                    )
                })?;
            }
        }

        let conn = Connection::open(db_path)
            .and_then(|conn| {
                Self::configure_connection(&conn)?;
                Self::ensure_schema(&conn)?;
                Ok(conn)
            })
            .map_err(|e| {
                EngineRegError::store_access(
                    namespace,
                    format!("Failed to open store {}: {}", db_path.display(), e),
                    None,
                )
            })?;

        debug!("Opened store {} [{}]", db_path.display(), namespace);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path: db_path.to_path_buf(),
            namespace: namespace.to_string(),
        })
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode=WAL;\n\
             PRAGMA busy_timeout={};\n\
             PRAGMA synchronous=NORMAL;",
            RegistryConfig::BUSY_TIMEOUT_MS,
        ))
    }

    fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS registry_values (
                namespace TEXT NOT NULL,
                name TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (namespace, name)
            );",
        )
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| EngineRegError::Database {
            message: "Failed to acquire store connection lock".to_string(),
            source: None,
        })
    }
}

impl RegistryStore for SqliteStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        let conn = self.lock_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM registry_values WHERE namespace = ?1 AND name = ?2",
                params![self.namespace, name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO registry_values (namespace, name, value)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(namespace, name) DO UPDATE SET value=excluded.value",
            params![self.namespace, name, value],
        )?;
        debug!("Set {} = {}", name, value);
        Ok(())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let conn = self.lock_conn()?;
        let rows = conn.execute(
            "DELETE FROM registry_values WHERE namespace = ?1 AND name = ?2",
            params![self.namespace, name],
        )?;
        if rows > 0 {
            debug!("Deleted {}", name);
        }
        Ok(rows > 0)
    }

    fn entries(&self) -> Result<Entries<'_>> {
        let conn = self.lock_conn()?;
        let mut stmt =
            conn.prepare("SELECT name, value FROM registry_values WHERE namespace = ?1")?;

        // Rows borrow the statement and the connection lock, so the whole
        // namespace is read out here rather than streamed.
        let entries: Vec<Result<RegistryEntry>> = stmt
            .query_map(params![self.namespace], |row| {
                Ok(RegistryEntry {
                    name: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .map(|row| row.map_err(EngineRegError::from))
            .collect();

        Ok(Box::new(entries.into_iter()))
    }
}
