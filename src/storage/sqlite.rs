//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::records::{PartRecord, VehicleRecord};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{BatchOutcome, RunRecord, RunStatus};
use crate::IngestError;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the catalog database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(IngestError::StoreConnection)` - The store is unusable; the run cannot proceed
    pub fn open(path: &Path) -> Result<Self, IngestError> {
        let conn = init_database(path).map_err(|e| {
            IngestError::StoreConnection(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Turns constraint failures into `StorageError::ConstraintViolation`
fn classify(error: rusqlite::Error) -> StorageError {
    match error {
        rusqlite::Error::SqliteFailure(ref failure, ref message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            StorageError::ConstraintViolation(
                message.clone().unwrap_or_else(|| failure.to_string()),
            )
        }
        other => StorageError::Sqlite(other),
    }
}

fn run_from_row(row: &Row) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        category: row.get(1)?,
        started_at: row.get(2)?,
        finished_at: row.get(3)?,
        config_hash: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?).unwrap_or(RunStatus::Failed),
        vehicles_attempted: row.get::<_, Option<i64>>(6)?.map(|n| n as u64),
        parts_attempted: row.get::<_, Option<i64>>(7)?.map(|n| n as u64),
        error_message: row.get(8)?,
    })
}

fn part_from_row(row: &Row) -> rusqlite::Result<PartRecord> {
    Ok(PartRecord {
        name: row.get(0)?,
        description: row.get(1)?,
        identifier: row.get(2)?,
        price: row.get(3)?,
        image_url: row.get(4)?,
        thumbnail_url: row.get(5)?,
    })
}

const RUN_COLUMNS: &str = "id, category, started_at, finished_at, config_hash, status,
     vehicles_attempted, parts_attempted, error_message";

impl SqliteStorage {
    fn count(&self, sql: &str, params: impl rusqlite::Params) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(count as u64)
    }

    fn strings(&self, sql: &str, params: impl rusqlite::Params) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let values = stmt
            .query_map(params, |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(values)
    }
}

impl Storage for SqliteStorage {
    // ===== Catalog Writes =====

    fn insert_vehicles(&mut self, vehicles: &[VehicleRecord]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO vehicles (vehicle_type, brand_name, model_name, listing_url, vehicle_id, year)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT DO NOTHING",
            )?;

            for vehicle in vehicles {
                inserted += stmt
                    .execute(params![
                        vehicle.category,
                        vehicle.brand,
                        vehicle.model,
                        vehicle.listing_url,
                        vehicle.identifier,
                        vehicle.year,
                    ])
                    .map_err(classify)?;
            }
        }

        // Dropping an uncommitted transaction rolls it back
        tx.commit()?;
        Ok(inserted)
    }

    fn insert_parts(&mut self, vehicles: &[VehicleRecord]) -> StorageResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO parts (part_name, description, part_id, vehicle_id, price, img_url, img_thumb_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT DO NOTHING",
            )?;

            for vehicle in vehicles {
                for part in &vehicle.parts {
                    inserted += stmt
                        .execute(params![
                            part.name,
                            part.description,
                            part.identifier,
                            vehicle.identifier,
                            part.price,
                            part.image_url,
                            part.thumbnail_url,
                        ])
                        .map_err(classify)?;
                }
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    // ===== Run Ledger =====

    fn begin_run(&mut self, category: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO ingest_runs (category, started_at, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![category, now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        outcome: Option<&BatchOutcome>,
        error_message: Option<&str>,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE ingest_runs
             SET status = ?1, finished_at = ?2, vehicles_attempted = ?3, parts_attempted = ?4, error_message = ?5
             WHERE id = ?6",
            params![
                status.to_db_string(),
                now,
                outcome.map(|o| o.vehicles_attempted as i64),
                outcome.map(|o| o.parts_attempted as i64),
                error_message,
                run_id,
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM ingest_runs WHERE id = ?1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, params![run_id], run_from_row)
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn recent_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>> {
        let sql = format!(
            "SELECT {} FROM ingest_runs ORDER BY id DESC LIMIT ?1",
            RUN_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let runs = stmt
            .query_map(params![limit as i64], run_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    // ===== Catalog Reads =====

    fn count_vehicles(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM vehicles", [])
    }

    fn count_parts(&self) -> StorageResult<u64> {
        self.count("SELECT COUNT(*) FROM parts", [])
    }

    fn count_vehicles_by_type(&self, vehicle_type: &str) -> StorageResult<u64> {
        self.count(
            "SELECT COUNT(*) FROM vehicles WHERE vehicle_type = ?1",
            params![vehicle_type],
        )
    }

    fn vehicle_types(&self) -> StorageResult<Vec<String>> {
        self.strings(
            "SELECT DISTINCT vehicle_type FROM vehicles ORDER BY vehicle_type",
            [],
        )
    }

    fn brands_for_type(&self, vehicle_type: &str) -> StorageResult<Vec<String>> {
        self.strings(
            "SELECT DISTINCT brand_name FROM vehicles WHERE vehicle_type = ?1 ORDER BY brand_name",
            params![vehicle_type],
        )
    }

    fn models_for_brand(&self, vehicle_type: &str, brand: &str) -> StorageResult<Vec<String>> {
        self.strings(
            "SELECT DISTINCT model_name FROM vehicles
             WHERE vehicle_type = ?1 AND brand_name = ?2 ORDER BY model_name",
            params![vehicle_type, brand],
        )
    }

    fn parts_for_vehicle(&self, vehicle_id: &str) -> StorageResult<Vec<PartRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT part_name, description, part_id, price, img_url, img_thumb_url
             FROM parts WHERE vehicle_id = ?1 ORDER BY part_name, part_id",
        )?;
        let parts = stmt
            .query_map(params![vehicle_id], part_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts)
    }

    fn get_vehicle(&self, vehicle_id: &str) -> StorageResult<Option<VehicleRecord>> {
        let vehicle = self
            .conn
            .query_row(
                "SELECT brand_name, model_name, vehicle_type, vehicle_id, year, listing_url
                 FROM vehicles WHERE vehicle_id = ?1",
                params![vehicle_id],
                |row| {
                    Ok(VehicleRecord {
                        brand: row.get(0)?,
                        model: row.get(1)?,
                        category: row.get(2)?,
                        identifier: row.get(3)?,
                        year: row.get(4)?,
                        listing_url: row.get(5)?,
                        parts: Vec::new(),
                    })
                },
            )
            .optional()?;

        match vehicle {
            Some(mut vehicle) => {
                vehicle.parts = self.parts_for_vehicle(vehicle_id)?;
                Ok(Some(vehicle))
            }
            None => Ok(None),
        }
    }
}

/// Opens a database file with pragmas applied and the schema initialized
pub fn init_database(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}
