//! Local filesystem storage implementation.
//!
//! Keeps the snapshot in a single JSON file. Writes go to a sibling temp
//! file first and are renamed into place, so an interrupted run never leaves
//! a truncated snapshot behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Posting;
use crate::storage::{SaveSummary, Snapshot, SnapshotFile, SnapshotStore};

/// Local filesystem snapshot backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Create a LocalStorage writing to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read the raw snapshot in whichever layout it was written.
    pub async fn read_file(&self) -> Result<Option<SnapshotFile>> {
        match self.read_bytes().await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalStorage {
    async fn load(&self) -> Result<Vec<Posting>> {
        let Some(file) = self.read_file().await? else {
            log::warn!("No previous snapshot found at {}", self.path.display());
            return Ok(Vec::new());
        };

        let mut postings = file.into_postings();
        let rekeyed = postings.iter_mut().map(Posting::rekey).filter(|&changed| changed).count();
        if rekeyed > 0 {
            log::info!("Re-derived ids for {} stored posting(s)", rekeyed);
        }

        log::info!(
            "Loaded {} previous posting(s) from {}",
            postings.len(),
            self.path.display()
        );
        Ok(postings)
    }

    async fn save(&self, postings: &[Posting]) -> Result<SaveSummary> {
        let snapshot = Snapshot::new(postings.to_vec());
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        self.write_bytes(&bytes).await?;

        log::info!(
            "Saved {} posting(s) to {}",
            snapshot.total_count,
            self.path.display()
        );
        Ok(SaveSummary {
            count: snapshot.total_count,
            location: self.path.display().to_string(),
            timestamp: snapshot.last_updated,
        })
    }
}
