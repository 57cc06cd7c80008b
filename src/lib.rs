//! Salvage-Ingest: a disassembled-vehicle catalog ingester
//!
//! This crate crawls a salvage parts catalog, turns the free-text listings into
//! structured vehicle and part records, and stores them idempotently in SQLite.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod identity;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod state;
pub mod storage;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Salvage-Ingest operations
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Duplicate identifier {identifier} in category '{category}'")]
    DuplicateIdentifier { identifier: String, category: String },

    #[error("Store connection failed: {0}")]
    StoreConnection(String),

    #[error("Vehicle transaction failed: {0}")]
    VehiclePhase(storage::StorageError),

    #[error("Part transaction failed: {0}")]
    PartPhase(storage::StorageError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Snapshot error for {path}: {message}")]
    Snapshot { path: String, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Returns true if the error must stop the whole run rather than one category
    pub fn is_fatal_for_run(&self) -> bool {
        matches!(self, Self::StoreConnection(_))
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Salvage-Ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::BrandLexicon;
pub use pipeline::{run_pipeline, CategoryOutcome, CategoryReport, IngestReport};
pub use records::{Category, PartRecord, RawPartRecord, RawVehicleRecord, VehicleRecord};
pub use state::BatchPhase;
