//! Registry of configured store backends.

use crate::kind::StoreKind;
use crate::traits::EvidenceStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps store kinds to their configured backends.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    stores: HashMap<StoreKind, Arc<dyn EvidenceStore>>,
}

impl StoreRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its kind, replacing any previous one.
    pub fn register(&mut self, store: Arc<dyn EvidenceStore>) {
        self.stores.insert(store.kind(), store);
    }

    /// Look up the backend for a kind.
    pub fn get(&self, kind: StoreKind) -> Option<&Arc<dyn EvidenceStore>> {
        self.stores.get(&kind)
    }

    /// Kinds with a configured backend.
    pub fn kinds(&self) -> Vec<StoreKind> {
        let mut kinds: Vec<StoreKind> = self.stores.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    /// Number of configured backends.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Whether no backend is configured.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}

impl std::fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
