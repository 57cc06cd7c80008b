//! State module for tracking ingestion progress
//!
//! # Components
//!
//! - `BatchPhase`: the persistence state machine for one category's batch
//! - `DomainState`: per-domain politeness bookkeeping for the crawler

mod batch_phase;
mod domain_state;

// Re-export main types
pub use batch_phase::BatchPhase;
pub use domain_state::DomainState;
