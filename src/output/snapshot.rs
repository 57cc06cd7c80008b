//! JSON snapshots of normalized category batches
//!
//! A snapshot lets a later run skip crawling and persist the same batch again.

use crate::records::VehicleRecord;
use crate::IngestError;
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the snapshot for `category` inside `snapshot_dir`
pub fn snapshot_path(snapshot_dir: &Path, category: &str) -> PathBuf {
    snapshot_dir.join(format!("{}_data.json", category))
}

/// Writes a category batch as pretty-printed JSON, creating the directory if needed
///
/// # Returns
///
/// The path of the written file
pub fn write_snapshot(
    snapshot_dir: &Path,
    category: &str,
    vehicles: &[VehicleRecord],
) -> Result<PathBuf, IngestError> {
    let path = snapshot_path(snapshot_dir, category);
    let snapshot_error = |message: String| IngestError::Snapshot {
        path: path.display().to_string(),
        message,
    };

    fs::create_dir_all(snapshot_dir).map_err(|e| snapshot_error(e.to_string()))?;
    let json = serde_json::to_string_pretty(vehicles).map_err(|e| snapshot_error(e.to_string()))?;
    fs::write(&path, json).map_err(|e| snapshot_error(e.to_string()))?;

    tracing::info!(
        "Wrote snapshot of {} vehicles to {}",
        vehicles.len(),
        path.display()
    );
    Ok(path)
}

/// Reads a category batch previously written by [`write_snapshot`]
pub fn read_snapshot(snapshot_dir: &Path, category: &str) -> Result<Vec<VehicleRecord>, IngestError> {
    let path = snapshot_path(snapshot_dir, category);
    let snapshot_error = |message: String| IngestError::Snapshot {
        path: path.display().to_string(),
        message,
    };

    let content = fs::read_to_string(&path).map_err(|e| snapshot_error(e.to_string()))?;
    let vehicles: Vec<VehicleRecord> =
        serde_json::from_str(&content).map_err(|e| snapshot_error(e.to_string()))?;

    tracing::info!(
        "Loaded snapshot of {} vehicles from {}",
        vehicles.len(),
        path.display()
    );
    Ok(vehicles)
}
