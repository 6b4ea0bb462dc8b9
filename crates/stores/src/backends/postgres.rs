//! PostgreSQL store backend.

use crate::error::StoreResult;
use crate::kind::StoreKind;
use crate::traits::EvidenceStore;
use async_trait::async_trait;
use exhibit_core::FeatureRecord;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::instrument;

/// Table schema, applied once before the first insert.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS evidence_features (
    id           BIGSERIAL PRIMARY KEY,
    filename     TEXT NOT NULL,
    file_system  TEXT NOT NULL,
    hash         TEXT NOT NULL,
    space        TEXT NOT NULL,
    total_files  BIGINT NOT NULL,
    size_bytes   BIGINT NOT NULL,
    recent_files JSONB NOT NULL,
    keys         JSONB NOT NULL,
    file_types   JSONB NOT NULL,
    stored_at    TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Feature record store backed by a PostgreSQL table.
pub struct PostgresStore {
    kind: StoreKind,
    pool: Pool<Postgres>,
    migrated: AtomicBool,
}

impl PostgresStore {
    /// Create a store from a connection URL without connecting.
    ///
    /// The pool connects on first use, so a misconfigured or unreachable
    /// database surfaces as an insert failure rather than a startup failure.
    pub fn connect_lazy(kind: StoreKind, url: &str, max_connections: u32) -> StoreResult<Self> {
        let opts = PgConnectOptions::from_str(url)?;
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy_with(opts);

        Ok(Self {
            kind,
            pool,
            migrated: AtomicBool::new(false),
        })
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        if self.migrated.load(Ordering::Acquire) {
            return Ok(());
        }
        // CREATE TABLE IF NOT EXISTS is idempotent, so a racing duplicate
        // application is harmless.
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        self.migrated.store(true, Ordering::Release);
        Ok(())
    }
}

#[async_trait]
impl EvidenceStore for PostgresStore {
    fn kind(&self) -> StoreKind {
        self.kind
    }

    #[instrument(skip(self, record), fields(backend = %self.kind, filename = %record.filename))]
    async fn insert(&self, record: &FeatureRecord) -> StoreResult<()> {
        self.ensure_schema().await?;

        sqlx::query(
            r#"
            INSERT INTO evidence_features
                (filename, file_system, hash, space, total_files, size_bytes,
                 recent_files, keys, file_types)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&record.filename)
        .bind(&record.file_system)
        .bind(&record.hash)
        .bind(&record.space)
        .bind(record.total_files as i64)
        .bind(record.size_bytes as i64)
        .bind(serde_json::to_value(&record.recent_files)?)
        .bind(serde_json::to_value(&record.keys)?)
        .bind(serde_json::to_value(&record.file_types)?)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
