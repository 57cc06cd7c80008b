//! Output module for snapshots and catalog reports
//!
//! This module handles:
//! - Writing and reading per-category JSON snapshots
//! - Loading and printing catalog statistics

pub mod snapshot;
pub mod stats;

pub use snapshot::{read_snapshot, snapshot_path, write_snapshot};
pub use stats::{load_statistics, print_statistics, render_statistics, CatalogStatistics};
