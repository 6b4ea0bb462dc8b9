//! Filesystem spool backend.
//!
//! Serializes each feature record to its own JSON document under the spool
//! root. Useful as a durable stand-in for backends whose drivers run out of
//! process, and as the backend of choice in tests.

use crate::error::{StoreError, StoreResult};
use crate::kind::StoreKind;
use crate::traits::EvidenceStore;
use async_trait::async_trait;
use exhibit_core::FeatureRecord;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

/// JSON spool on the local filesystem, one document per insert.
pub struct FilesystemStore {
    kind: StoreKind,
    root: PathBuf,
}

impl FilesystemStore {
    /// Create a spool rooted at `root`, creating the directory if needed.
    pub fn new(kind: StoreKind, root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { kind, root })
    }

    /// Spool root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl EvidenceStore for FilesystemStore {
    fn kind(&self) -> StoreKind {
        self.kind
    }

    #[instrument(skip(self, record), fields(backend = %self.kind, filename = %record.filename))]
    async fn insert(&self, record: &FeatureRecord) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(record)?;

        // Write to a temp file, fsync, then rename so a crash never leaves
        // a partially written document in the spool.
        let final_path = self.root.join(format!("{}.json", Uuid::new_v4()));
        let temp_path = final_path.with_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(&json).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, &final_path).await?;

        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        let metadata = fs::metadata(&self.root).await.map_err(|e| {
            StoreError::Connection(format!("spool root not accessible: {e}"))
        })?;
        if !metadata.is_dir() {
            return Err(StoreError::Connection(format!(
                "spool root is not a directory: {}",
                self.root.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exhibit_core::{RawFeatures, normalize};

    fn record(filename: &str) -> FeatureRecord {
        normalize(RawFeatures {
            filename: Some(filename.to_string()),
            total_files: Some(3),
            ..Default::default()
        })
    }

    async fn spooled_documents(root: &Path) -> Vec<FeatureRecord> {
        let mut records = Vec::new();
        let mut entries = fs::read_dir(root).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let path = entry.path();
            assert_eq!(path.extension().unwrap(), "json");
            let json = fs::read(&path).await.unwrap();
            records.push(serde_json::from_slice(&json).unwrap());
        }
        records
    }

    #[tokio::test]
    async fn insert_writes_one_document_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemStore::new(StoreKind::Vector, dir.path()).unwrap();

        store.insert(&record("a.dd")).await.unwrap();
        store.insert(&record("b.dd")).await.unwrap();

        let docs = spooled_documents(dir.path()).await;
        assert_eq!(docs.len(), 2);
        let mut names: Vec<&str> = docs.iter().map(|r| r.filename.as_str()).collect();
        names.sort();
        assert_eq!(names, ["a.dd", "b.dd"]);
    }

    #[tokio::test]
    async fn insert_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemStore::new(StoreKind::MongoDb, dir.path()).unwrap();

        store.insert(&record("disk.E01")).await.unwrap();

        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name();
            assert!(
                name.to_string_lossy().ends_with(".json"),
                "unexpected file in spool: {name:?}"
            );
        }
    }

    #[tokio::test]
    async fn new_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("spool").join("vector");
        let store = FilesystemStore::new(StoreKind::Vector, &nested).unwrap();

        assert!(nested.is_dir());
        store.health_check().await.unwrap();
    }
}
