//! Statistics generation from the catalog database
//!
//! This module provides functionality for extracting and displaying
//! catalog statistics from the storage layer.

use crate::storage::{RunRecord, Storage};
use crate::IngestError;
use std::fmt::Write;

/// Number of ledger entries included in the statistics
const RECENT_RUN_LIMIT: usize = 10;

/// Per-category figures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStatistics {
    pub category: String,
    pub vehicles: u64,
    pub brands: Vec<String>,
}

/// Catalog statistics summary
#[derive(Debug, Clone)]
pub struct CatalogStatistics {
    /// Total number of vehicles stored
    pub total_vehicles: u64,

    /// Total number of parts stored
    pub total_parts: u64,

    /// Figures per category, in category name order
    pub categories: Vec<CategoryStatistics>,

    /// Latest ingestion runs, newest first
    pub recent_runs: Vec<RunRecord>,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn Storage) -> Result<CatalogStatistics, IngestError> {
    let total_vehicles = storage.count_vehicles()?;
    let total_parts = storage.count_parts()?;

    let mut categories = Vec::new();
    for category in storage.vehicle_types()? {
        categories.push(CategoryStatistics {
            vehicles: storage.count_vehicles_by_type(&category)?,
            brands: storage.brands_for_type(&category)?,
            category,
        });
    }

    let recent_runs = storage.recent_runs(RECENT_RUN_LIMIT)?;

    Ok(CatalogStatistics {
        total_vehicles,
        total_parts,
        categories,
        recent_runs,
    })
}

/// Formats statistics as a human-readable report
pub fn render_statistics(stats: &CatalogStatistics) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "=== Catalog Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Vehicles: {}", stats.total_vehicles);
    let _ = writeln!(out, "  Parts: {}", stats.total_parts);
    let _ = writeln!(out);

    if !stats.categories.is_empty() {
        let _ = writeln!(out, "Categories:");
        for category in &stats.categories {
            let _ = writeln!(
                out,
                "  {}: {} vehicles, {} brands",
                category.category,
                category.vehicles,
                category.brands.len()
            );
            if !category.brands.is_empty() {
                let _ = writeln!(out, "    {}", category.brands.join(", "));
            }
        }
        let _ = writeln!(out);
    }

    if !stats.recent_runs.is_empty() {
        let _ = writeln!(out, "Recent Runs:");
        for run in &stats.recent_runs {
            let _ = write!(
                out,
                "  #{} {} {} ({})",
                run.id,
                run.category,
                run.status.to_db_string(),
                run.started_at
            );
            if let (Some(vehicles), Some(parts)) = (run.vehicles_attempted, run.parts_attempted) {
                let _ = write!(out, " {} vehicles, {} parts", vehicles, parts);
            }
            if let Some(error) = &run.error_message {
                let _ = write!(out, " - {}", error);
            }
            let _ = writeln!(out);
        }
    }

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CatalogStatistics) {
    print!("{}", render_statistics(stats));
}
