//! Store trait definitions.

use crate::error::StoreResult;
use crate::kind::StoreKind;
use async_trait::async_trait;
use exhibit_core::FeatureRecord;

/// One storage backend for extracted feature records.
///
/// Connection lifecycle is owned by the implementation; the dispatcher
/// only ever calls `insert` and treats every failure as isolated to this
/// backend.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Which vocabulary kind this backend serves.
    fn kind(&self) -> StoreKind;

    /// Persist one feature record. Exactly one attempt per dispatch.
    async fn insert(&self, record: &FeatureRecord) -> StoreResult<()>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> StoreResult<()>;
}
