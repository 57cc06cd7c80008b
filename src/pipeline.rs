//! End-to-end ingestion: crawl or load, normalize, snapshot, persist
//!
//! Categories are processed one after another in name order. Each one runs to
//! completion, persistence included, before the next starts.

use crate::config::Config;
use crate::crawler::Coordinator;
use crate::extract::BrandLexicon;
use crate::normalize::normalize_batch;
use crate::output::{read_snapshot, write_snapshot};
use crate::records::{Category, VehicleRecord};
use crate::storage::{persist_batch, BatchOutcome, RunStatus, Storage, StorageError};
use crate::IngestError;
use std::path::Path;

/// What happened to one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryOutcome {
    Committed(BatchOutcome),
    Failed(String),
}

/// Result of one category within a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryReport {
    pub category: String,
    pub outcome: CategoryOutcome,
}

/// Result of a whole ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub categories: Vec<CategoryReport>,
}

impl IngestReport {
    /// Vehicles plus parts handed to the store by committed categories
    pub fn total_written(&self) -> usize {
        self.categories
            .iter()
            .filter_map(|report| match &report.outcome {
                CategoryOutcome::Committed(outcome) => {
                    Some(outcome.vehicles_attempted + outcome.parts_attempted)
                }
                CategoryOutcome::Failed(_) => None,
            })
            .sum()
    }

    /// Number of categories that failed
    pub fn failed_count(&self) -> usize {
        self.categories
            .iter()
            .filter(|report| matches!(report.outcome, CategoryOutcome::Failed(_)))
            .count()
    }
}

/// The run ledger shares the catalog's connection; losing it ends the run
fn ledger_error(error: StorageError) -> IngestError {
    IngestError::StoreConnection(format!("run ledger: {}", error))
}

/// Runs ingestion for every configured category
///
/// With `load-from-snapshot` the batches come from the snapshot directory;
/// otherwise every category is crawled and its snapshot rewritten.
///
/// # Returns
///
/// * `Ok(IngestReport)` - Every category was attempted; see the report for failures
/// * `Err(IngestError)` - The store became unusable and the run stopped
pub async fn run_pipeline<S: Storage + ?Sized>(
    config: &Config,
    storage: &mut S,
    config_hash: &str,
) -> Result<IngestReport, IngestError> {
    let lexicon = BrandLexicon::with_extras(&config.lexicon.extra_brands);
    let snapshot_dir = Path::new(&config.output.snapshot_dir);
    let coordinator = if config.output.load_from_snapshot {
        tracing::info!("Loading batches from snapshots in {}", snapshot_dir.display());
        None
    } else {
        Some(Coordinator::new(config)?)
    };

    let mut report = IngestReport::default();

    for (name, listing_url) in &config.categories {
        let category = Category::new(name.as_str(), listing_url.as_str());
        let run_id = storage.begin_run(name, config_hash).map_err(ledger_error)?;

        let result = ingest_category(
            &category,
            coordinator.as_ref(),
            snapshot_dir,
            &lexicon,
            &mut *storage,
        )
        .await;

        let outcome = match result {
            Ok(outcome) => {
                storage
                    .finish_run(run_id, RunStatus::Committed, Some(&outcome), None)
                    .map_err(ledger_error)?;
                CategoryOutcome::Committed(outcome)
            }
            Err(e) if e.is_fatal_for_run() => {
                tracing::error!("Stopping run at category '{}': {}", name, e);
                if let Err(ledger) =
                    storage.finish_run(run_id, RunStatus::Failed, None, Some(&e.to_string()))
                {
                    tracing::debug!("Could not record failure of run {}: {}", run_id, ledger);
                }
                return Err(e);
            }
            Err(e) => {
                tracing::error!("Category '{}' failed: {}", name, e);
                storage
                    .finish_run(run_id, RunStatus::for_error(&e), None, Some(&e.to_string()))
                    .map_err(ledger_error)?;
                CategoryOutcome::Failed(e.to_string())
            }
        };

        report.categories.push(CategoryReport {
            category: name.clone(),
            outcome,
        });
    }

    tracing::info!(
        "Run finished: {} categories, {} failed, {} records written",
        report.categories.len(),
        report.failed_count(),
        report.total_written()
    );

    Ok(report)
}

async fn ingest_category<S: Storage + ?Sized>(
    category: &Category,
    coordinator: Option<&Coordinator>,
    snapshot_dir: &Path,
    lexicon: &BrandLexicon,
    storage: &mut S,
) -> Result<BatchOutcome, IngestError> {
    let vehicles = match coordinator {
        None => read_snapshot(snapshot_dir, &category.name)?,
        Some(coordinator) => crawl_and_normalize(category, coordinator, snapshot_dir, lexicon).await?,
    };

    persist_batch(storage, &category.name, &vehicles)
}

async fn crawl_and_normalize(
    category: &Category,
    coordinator: &Coordinator,
    snapshot_dir: &Path,
    lexicon: &BrandLexicon,
) -> Result<Vec<VehicleRecord>, IngestError> {
    let raw_vehicles = coordinator.crawl_category(category).await?;
    let vehicles = normalize_batch(&raw_vehicles, &category.name, lexicon);

    if let Err(e) = write_snapshot(snapshot_dir, &category.name, &vehicles) {
        tracing::warn!("Snapshot not written for '{}': {}", category.name, e);
    }

    Ok(vehicles)
}
