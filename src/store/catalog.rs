//! Reference catalog of known region names.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

use super::AssessmentStore;

/// Known state, district and block names, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub states: Vec<String>,
    pub districts: Vec<String>,
    pub blocks: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, name: impl Into<String>) -> Self {
        self.states.push(name.into());
        self
    }

    pub fn with_district(mut self, name: impl Into<String>) -> Self {
        self.districts.push(name.into());
        self
    }

    pub fn with_block(mut self, name: impl Into<String>) -> Self {
        self.blocks.push(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.districts.is_empty() && self.blocks.is_empty()
    }

    /// Read all names from an open connection.
    pub fn read(conn: &Connection) -> Result<Self, StoreError> {
        Ok(Self {
            states: read_names(conn, "SELECT state_name FROM states ORDER BY state_id")?,
            districts: read_names(
                conn,
                "SELECT district_name FROM districts ORDER BY district_id",
            )?,
            blocks: read_names(conn, "SELECT block_name FROM blocks ORDER BY block_id")?,
        })
    }
}

fn read_names(conn: &Connection, sql: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

/// Source of reference names for entity extraction.
pub trait CatalogSource: Send + Sync {
    /// List every known region name. Implementations read fresh on each call.
    fn list_known_names(&self) -> Result<Catalog, StoreError>;
}

impl CatalogSource for AssessmentStore {
    fn list_known_names(&self) -> Result<Catalog, StoreError> {
        let conn = self.connect_catalog()?;
        Catalog::read(&conn)
    }
}

impl CatalogSource for Catalog {
    fn list_known_names(&self) -> Result<Catalog, StoreError> {
        Ok(self.clone())
    }
}
