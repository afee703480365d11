//! Persistent cache of geocoded locations

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::debug;

use crate::models::Location;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create cache directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS locations (
    query      TEXT PRIMARY KEY,
    formatted  TEXT NOT NULL,
    latitude   REAL NOT NULL,
    longitude  REAL NOT NULL,
    fetched_at TEXT NOT NULL
);
";

/// SQLite-backed cache of successful geocoder lookups
pub struct LocationCache {
    conn: Mutex<Connection>,
}

impl LocationCache {
    /// Open (or create) the cache file and ensure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        Self::bootstrap(Connection::open(path)?)
    }

    /// Cache that lives only as long as the process
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Default cache location in the platform data directory
    pub fn default_path() -> PathBuf {
        if let Some(proj_dirs) = ProjectDirs::from("com", "kundli", "kundli-engine") {
            proj_dirs.data_dir().join("geocode_cache.sqlite3")
        } else {
            // Fallback to current directory
            PathBuf::from("geocode_cache.sqlite3")
        }
    }

    fn key(city: &str) -> String {
        city.trim().to_lowercase()
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up a cached location. The returned `city` echoes the caller's spelling.
    pub fn get(&self, city: &str) -> Result<Option<Location>, StorageError> {
        let conn = self.conn();
        let found = conn
            .query_row(
                "SELECT formatted, latitude, longitude FROM locations WHERE query = ?1",
                params![Self::key(city)],
                |row| {
                    Ok(Location {
                        city: city.to_string(),
                        formatted: row.get(0)?,
                        latitude: row.get(1)?,
                        longitude: row.get(2)?,
                    })
                },
            )
            .optional()?;
        debug!(city, hit = found.is_some(), "geocode cache lookup");
        Ok(found)
    }

    /// Insert or refresh a location
    pub fn put(&self, location: &Location) -> Result<(), StorageError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO locations (query, formatted, latitude, longitude, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(query) DO UPDATE SET
                formatted = excluded.formatted,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                fetched_at = excluded.fetched_at",
            params![
                Self::key(&location.city),
                location.formatted,
                location.latitude,
                location.longitude,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Number of cached locations
    pub fn count(&self) -> Result<usize, StorageError> {
        let conn = self.conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
