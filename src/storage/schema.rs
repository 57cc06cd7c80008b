//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the catalog database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per disassembled vehicle
CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    vehicle_type TEXT NOT NULL,
    brand_name TEXT NOT NULL,
    model_name TEXT NOT NULL,
    listing_url TEXT NOT NULL,
    vehicle_id TEXT NOT NULL UNIQUE,
    year INTEGER NOT NULL CHECK (year >= 0),
    UNIQUE(vehicle_type, brand_name, model_name, listing_url)
);

CREATE INDEX IF NOT EXISTS idx_vehicles_type_brand ON vehicles(vehicle_type, brand_name);

-- Parts salvaged from a vehicle
CREATE TABLE IF NOT EXISTS parts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    part_name TEXT NOT NULL,
    description TEXT NOT NULL,
    part_id TEXT NOT NULL UNIQUE,
    vehicle_id TEXT NOT NULL REFERENCES vehicles(vehicle_id),
    price REAL NOT NULL,
    img_url TEXT NOT NULL,
    img_thumb_url TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_parts_vehicle ON parts(vehicle_id);

-- One row per category ingestion attempt
CREATE TABLE IF NOT EXISTS ingest_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    vehicles_attempted INTEGER,
    parts_attempted INTEGER,
    error_message TEXT
);

CREATE INDEX IF NOT EXISTS idx_ingest_runs_category ON ingest_runs(category);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
