//! Validation and two-transaction persistence of one category batch

use crate::records::VehicleRecord;
use crate::state::BatchPhase;
use crate::storage::Storage;
use crate::IngestError;
use std::collections::HashSet;

/// Counts reported for a committed batch
///
/// These are the numbers of records handed to the store, not the rows
/// actually inserted, since conflicting rows are skipped silently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub vehicles_attempted: usize,
    pub parts_attempted: usize,
}

/// Returns the first identifier that occurs more than once in `vehicles`
pub fn find_duplicate_identifier(vehicles: &[VehicleRecord]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(vehicles.len());
    vehicles
        .iter()
        .map(|vehicle| vehicle.identifier.as_str())
        .find(|identifier| !seen.insert(*identifier))
}

/// Tracks a batch through its phases
struct PhaseTracker<'a> {
    category: &'a str,
    phase: BatchPhase,
}

impl<'a> PhaseTracker<'a> {
    fn new(category: &'a str) -> Self {
        tracing::debug!("Batch '{}': {}", category, BatchPhase::Validating);
        Self {
            category,
            phase: BatchPhase::Validating,
        }
    }

    fn advance(&mut self, to: BatchPhase) {
        debug_assert!(
            self.phase.can_transition_to(to),
            "illegal batch transition {} -> {}",
            self.phase,
            to
        );
        tracing::debug!("Batch '{}': {} -> {}", self.category, self.phase, to);
        self.phase = to;
    }

    fn abort(&mut self, error: IngestError) -> IngestError {
        tracing::warn!(
            "Batch '{}' aborted during {}: {}",
            self.category,
            self.phase,
            error
        );
        self.advance(BatchPhase::Aborted);
        error
    }
}

/// Validates and persists one category's normalized vehicles
///
/// Phases:
/// 1. **Validating** - a duplicate identifier rejects the whole batch, nothing is written
/// 2. **WritingVehicles** - one transaction; any error rolls back every vehicle of the batch
/// 3. **WritingParts** - a second transaction; an error rolls back the parts only,
///    vehicles from phase 2 stay committed
/// 4. **Committed**
///
/// # Returns
///
/// * `Ok(BatchOutcome)` - Both transactions committed
/// * `Err(IngestError::DuplicateIdentifier)` - Rejected during validation
/// * `Err(IngestError::VehiclePhase)` - Vehicle transaction rolled back
/// * `Err(IngestError::PartPhase)` - Part transaction rolled back
pub fn persist_batch<S: Storage + ?Sized>(
    storage: &mut S,
    category: &str,
    vehicles: &[VehicleRecord],
) -> Result<BatchOutcome, IngestError> {
    let mut tracker = PhaseTracker::new(category);

    if let Some(identifier) = find_duplicate_identifier(vehicles) {
        return Err(tracker.abort(IngestError::DuplicateIdentifier {
            identifier: identifier.to_string(),
            category: category.to_string(),
        }));
    }

    tracker.advance(BatchPhase::WritingVehicles);
    let inserted_vehicles = storage
        .insert_vehicles(vehicles)
        .map_err(|e| tracker.abort(IngestError::VehiclePhase(e)))?;

    tracker.advance(BatchPhase::WritingParts);
    let inserted_parts = storage
        .insert_parts(vehicles)
        .map_err(|e| tracker.abort(IngestError::PartPhase(e)))?;

    tracker.advance(BatchPhase::Committed);

    let outcome = BatchOutcome {
        vehicles_attempted: vehicles.len(),
        parts_attempted: vehicles.iter().map(|v| v.parts.len()).sum(),
    };
    tracing::info!(
        "Committed '{}': {} vehicles ({} new), {} parts ({} new)",
        category,
        outcome.vehicles_attempted,
        inserted_vehicles,
        outcome.parts_attempted,
        inserted_parts
    );

    Ok(outcome)
}
