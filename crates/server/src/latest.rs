//! Single-slot cache of the most recent completed extraction.

use exhibit_core::SharedRecord;
use std::sync::{PoisonError, RwLock};

/// Holds the latest completed FeatureRecord for chart projections.
///
/// Replacement is atomic and last-completion-wins: with concurrent jobs
/// the slot holds whichever record was published most recently, never a
/// partially written one. Readers get a cheap Arc clone.
#[derive(Default)]
pub struct LatestResultCache {
    slot: RwLock<Option<SharedRecord>>,
}

impl LatestResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached record with a newer completion.
    pub fn publish(&self, record: SharedRecord) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(record);
    }

    /// Get the latest record, if any extraction has completed yet.
    pub fn get(&self) -> Option<SharedRecord> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
