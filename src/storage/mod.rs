//! Storage module for persisting the catalog
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Duplicate-identifier validation of a category batch
//! - Two-transaction vehicle and part writes
//! - The per-category ingestion run ledger
//! - Read helpers for statistics

mod batch;
mod schema;
mod sqlite;
mod traits;

pub use batch::{find_duplicate_identifier, persist_batch, BatchOutcome};
pub use sqlite::{init_database, SqliteStorage};
pub use traits::{Storage, StorageError, StorageResult};

use crate::IngestError;

/// Represents one category ingestion attempt
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub category: String,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
    pub vehicles_attempted: Option<u64>,
    pub parts_attempted: Option<u64>,
    pub error_message: Option<String>,
}

/// Status of a category ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Crawl or persistence in progress
    Running,
    /// Vehicles and parts committed
    Committed,
    /// Rejected before anything was written, or the vehicle transaction rolled back
    Aborted,
    /// Vehicles committed, part transaction rolled back
    PartsFailed,
    /// The category never reached persistence
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
            Self::PartsFailed => "parts_failed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "committed" => Some(Self::Committed),
            "aborted" => Some(Self::Aborted),
            "parts_failed" => Some(Self::PartsFailed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Final status of a run that ended with `error`
    pub fn for_error(error: &IngestError) -> Self {
        match error {
            IngestError::DuplicateIdentifier { .. } | IngestError::VehiclePhase(_) => Self::Aborted,
            IngestError::PartPhase(_) => Self::PartsFailed,
            _ => Self::Failed,
        }
    }
}
