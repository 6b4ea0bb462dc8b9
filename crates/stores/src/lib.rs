//! Evidence store abstraction and fan-out for Exhibit.
//!
//! This crate provides:
//! - The `EvidenceStore` trait, one implementation per backend kind
//! - The fixed store-kind vocabulary used by submissions
//! - A registry mapping kinds to configured backends
//! - Best-effort fan-out dispatch with per-store failure isolation
//! - Built-in backends: filesystem spool and PostgreSQL

pub mod backends;
pub mod dispatch;
pub mod error;
pub mod kind;
pub mod registry;
pub mod traits;

pub use backends::{filesystem::FilesystemStore, postgres::PostgresStore};
pub use dispatch::{StoreOutcome, dispatch};
pub use error::{StoreError, StoreResult};
pub use kind::StoreKind;
pub use registry::StoreRegistry;
pub use traits::EvidenceStore;

use exhibit_core::config::{BackendConfig, StoreEntry};
use std::sync::Arc;

/// Build a store registry from configuration entries.
///
/// Each entry registers one backend for one store kind; a kind configured
/// twice keeps the last registration.
pub fn from_config(entries: &[StoreEntry]) -> StoreResult<StoreRegistry> {
    let mut registry = StoreRegistry::new();

    for entry in entries {
        let kind: StoreKind = entry.kind.parse()?;
        let store: Arc<dyn EvidenceStore> = match &entry.backend {
            BackendConfig::Filesystem { path } => Arc::new(FilesystemStore::new(kind, path)?),
            BackendConfig::Postgres {
                url,
                max_connections,
            } => Arc::new(PostgresStore::connect_lazy(kind, url, *max_connections)?),
        };
        registry.register(store);
    }

    Ok(registry)
}
