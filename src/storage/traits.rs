//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::records::{PartRecord, VehicleRecord};
use crate::storage::{BatchOutcome, RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The write side is split in two: `insert_vehicles` and `insert_parts` each
/// run inside their own transaction. Sequencing them, and validating a batch
/// first, is the job of [`crate::storage::persist_batch`].
pub trait Storage {
    // ===== Catalog Writes =====

    /// Inserts the vehicle rows of a batch in one transaction
    ///
    /// Rows that conflict with an existing vehicle are skipped. Any other
    /// error rolls the whole transaction back.
    ///
    /// # Returns
    ///
    /// The number of rows actually inserted
    fn insert_vehicles(&mut self, vehicles: &[VehicleRecord]) -> StorageResult<usize>;

    /// Inserts the part rows of every vehicle of a batch in one transaction
    ///
    /// Parts whose identifier already exists are skipped. Any other error
    /// rolls the whole transaction back.
    ///
    /// # Returns
    ///
    /// The number of rows actually inserted
    fn insert_parts(&mut self, vehicles: &[VehicleRecord]) -> StorageResult<usize>;

    // ===== Run Ledger =====

    /// Records the start of a category ingestion
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn begin_run(&mut self, category: &str, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as finished with its final status
    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        outcome: Option<&BatchOutcome>,
        error_message: Option<&str>,
    ) -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent runs, newest first
    fn recent_runs(&self, limit: usize) -> StorageResult<Vec<RunRecord>>;

    // ===== Catalog Reads =====

    /// Gets total vehicle count
    fn count_vehicles(&self) -> StorageResult<u64>;

    /// Gets total part count
    fn count_parts(&self) -> StorageResult<u64>;

    /// Counts vehicles of one category
    fn count_vehicles_by_type(&self, vehicle_type: &str) -> StorageResult<u64>;

    /// Gets the sorted list of categories present in the store
    fn vehicle_types(&self) -> StorageResult<Vec<String>>;

    /// Gets the sorted list of brands present in one category
    fn brands_for_type(&self, vehicle_type: &str) -> StorageResult<Vec<String>>;

    /// Gets the sorted list of models of one brand within one category
    fn models_for_brand(&self, vehicle_type: &str, brand: &str) -> StorageResult<Vec<String>>;

    /// Gets the parts of one vehicle, ordered by name
    fn parts_for_vehicle(&self, vehicle_id: &str) -> StorageResult<Vec<PartRecord>>;

    /// Gets one vehicle with its parts
    fn get_vehicle(&self, vehicle_id: &str) -> StorageResult<Option<VehicleRecord>>;
}
