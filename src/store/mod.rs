//! Read-only access to the groundwater assessment database.
//!
//! The store hands out short-lived SQLite connections: one per resolution
//! and a separate, short-timeout one for the reference catalog. Connections
//! close on drop, so every exit path releases them.

mod catalog;
pub mod schema;

pub use catalog::{Catalog, CatalogSource};

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::config::Config;
use crate::error::StoreError;

/// Handle to the assessment database on disk.
#[derive(Debug, Clone)]
pub struct AssessmentStore {
    path: PathBuf,
    catalog_timeout: Duration,
    busy_timeout: Duration,
}

impl AssessmentStore {
    /// Create a store handle with default timeouts.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            catalog_timeout: Duration::from_secs(3),
            busy_timeout: Duration::from_secs(5),
        }
    }

    /// Create a store handle from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            path: config.database_path(),
            catalog_timeout: config.store.catalog_timeout(),
            busy_timeout: config.store.busy_timeout(),
        }
    }

    /// Override the catalog lookup timeout.
    pub fn with_catalog_timeout(mut self, timeout: Duration) -> Self {
        self.catalog_timeout = timeout;
        self
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a read-only connection for query resolution.
    pub fn connect(&self) -> Result<Connection, StoreError> {
        self.open_read_only(self.busy_timeout)
    }

    /// Open a read-only connection for the reference catalog.
    pub fn connect_catalog(&self) -> Result<Connection, StoreError> {
        self.open_read_only(self.catalog_timeout)
    }

    fn open_read_only(&self, timeout: Duration) -> Result<Connection, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound(self.path.display().to_string()));
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(timeout)?;

        tracing::trace!(path = %self.path.display(), "Opened store connection");
        Ok(conn)
    }
}
