//! File catalog — the metadata collaborator
//!
//! `JsonCatalog` keeps records in memory and persists them to a JSON file
//! with an atomic temp-then-rename write, so a crash mid-flush never
//! leaves a torn catalog behind.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use fragvault_core::{FileRecord, VaultError, VaultResult};

/// Persistence for `FileRecord`s.
///
/// `create` commits a record exactly once; `find_by_id` returns `None` for
/// unknown ids rather than an error so the caller decides how absence
/// surfaces.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn create(&self, record: FileRecord) -> VaultResult<String>;
    async fn find_by_id(&self, id: &str) -> VaultResult<Option<FileRecord>>;
}

/// In-memory catalog persisted to a JSON file.
pub struct JsonCatalog {
    path: PathBuf,
    entries: Mutex<HashMap<String, FileRecord>>,
}

impl JsonCatalog {
    /// Load or create a catalog at the given path. A missing file starts
    /// an empty catalog.
    pub fn open(path: &Path) -> VaultResult<Self> {
        let entries = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str(&content).map_err(|e| {
                VaultError::Format(format!("parsing catalog {}: {e}", path.display()))
            })?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    /// Atomic write: serialize to a temp file, then rename over the target.
    async fn flush(&self, entries: &HashMap<String, FileRecord>) -> VaultResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| anyhow::anyhow!("serializing catalog: {e}"))?;

        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl Catalog for JsonCatalog {
    async fn create(&self, record: FileRecord) -> VaultResult<String> {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(&record.id) {
            return Err(VaultError::Storage(format!(
                "catalog id collision: {}",
                record.id
            )));
        }

        let id = record.id.clone();
        entries.insert(id.clone(), record);
        if let Err(err) = self.flush(&entries).await {
            // Memory and disk must agree: a failed flush leaves no record.
            entries.remove(&id);
            return Err(err);
        }

        tracing::debug!(file_id = %id, "catalog record committed");
        Ok(id)
    }

    async fn find_by_id(&self, id: &str) -> VaultResult<Option<FileRecord>> {
        Ok(self.entries.lock().await.get(id).cloned())
    }
}
