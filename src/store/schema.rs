//! Schema of the assessment database.

use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreError;

/// DDL for the region hierarchy, yearly assessments and monthly readings.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS states (
    state_id INTEGER PRIMARY KEY,
    state_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS districts (
    district_id INTEGER PRIMARY KEY,
    district_name TEXT NOT NULL,
    state_id INTEGER,
    FOREIGN KEY (state_id) REFERENCES states(state_id)
);

CREATE TABLE IF NOT EXISTS blocks (
    block_id INTEGER PRIMARY KEY,
    block_name TEXT NOT NULL,
    district_id INTEGER,
    FOREIGN KEY (district_id) REFERENCES districts(district_id)
);

CREATE TABLE IF NOT EXISTS groundwater_assessment (
    assessment_id INTEGER PRIMARY KEY,
    block_id INTEGER,
    assessment_year INTEGER,
    annual_recharge_mcm REAL,
    extractable_resources_mcm REAL,
    total_extraction_mcm REAL,
    stage_of_extraction REAL,
    category TEXT,
    water_level_pre_monsoon REAL,
    water_level_post_monsoon REAL,
    FOREIGN KEY (block_id) REFERENCES blocks(block_id)
);

CREATE TABLE IF NOT EXISTS historical_data (
    id INTEGER PRIMARY KEY,
    block_id INTEGER,
    year INTEGER,
    month INTEGER,
    water_level REAL,
    rainfall_mm REAL,
    FOREIGN KEY (block_id) REFERENCES blocks(block_id)
);
"#;

/// Create any missing tables on an open connection.
pub fn initialize(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Create (or open) the database file at `path` and ensure the schema exists.
pub fn initialize_at(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(format!("{}: {}", parent.display(), e)))?;
        }
    }

    let conn = Connection::open(path)?;
    initialize(&conn)?;
    tracing::info!(path = %path.display(), "Initialized assessment schema");
    Ok(conn)
}
