//! Best-effort fan-out dispatch.
//!
//! Every requested backend gets exactly one insert attempt. A failed or
//! unrecognized backend is captured in its outcome and never aborts the
//! remaining backends; there is no rollback and no cross-store
//! transaction. Evidentiary redundancy is preferred over strict
//! consistency here.

use crate::kind::StoreKind;
use crate::registry::StoreRegistry;
use exhibit_core::FeatureRecord;
use serde::{Deserialize, Serialize};

/// Result of one backend's insert attempt.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreOutcome {
    /// Backend identifier as requested by the caller.
    pub backend: String,
    /// Whether the insert succeeded.
    pub ok: bool,
    /// Failure description when `ok` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StoreOutcome {
    fn success(backend: &str) -> Self {
        Self {
            backend: backend.to_string(),
            ok: true,
            error: None,
        }
    }

    fn failure(backend: &str, error: String) -> Self {
        Self {
            backend: backend.to_string(),
            ok: false,
            error: Some(error),
        }
    }
}

/// Insert `record` into every requested backend, isolating failures.
///
/// Returns one outcome per requested identifier, in request order.
/// Unknown identifiers and unconfigured kinds are reported as failed
/// outcomes rather than silently skipped.
pub async fn dispatch(
    registry: &StoreRegistry,
    record: &FeatureRecord,
    requested: &[String],
) -> Vec<StoreOutcome> {
    let mut outcomes = Vec::with_capacity(requested.len());

    for name in requested {
        let kind: StoreKind = match name.parse() {
            Ok(kind) => kind,
            Err(e) => {
                tracing::warn!(backend = %name, error = %e, "Unknown store kind requested");
                outcomes.push(StoreOutcome::failure(name, e.to_string()));
                continue;
            }
        };

        let Some(store) = registry.get(kind) else {
            tracing::warn!(backend = %kind, "Requested store kind has no configured backend");
            outcomes.push(StoreOutcome::failure(
                name,
                format!("no backend configured for store kind: {kind}"),
            ));
            continue;
        };

        match store.insert(record).await {
            Ok(()) => {
                tracing::info!(backend = %kind, filename = %record.filename, "Record stored");
                outcomes.push(StoreOutcome::success(name));
            }
            Err(e) => {
                tracing::error!(
                    backend = %kind,
                    filename = %record.filename,
                    error = %e,
                    "Store insert failed"
                );
                outcomes.push(StoreOutcome::failure(name, e.to_string()));
            }
        }
    }

    outcomes
}
