//! Quarterly snapshot files: `<root>/<folder>/<YYYY-QN>.json`.

use std::path::{Path, PathBuf};

use superinv_core::{QuarterPeriod, QuarterlySnapshot};

use crate::records::StoredSnapshot;
use crate::{write_json_atomic, StoreError};

/// Snapshot files rooted at one output directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the record for `folder` and `period`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidFolder`] if `folder` is empty, contains a
    /// path separator, or starts with `.`.
    pub fn snapshot_path(&self, folder: &str, period: QuarterPeriod) -> Result<PathBuf, StoreError> {
        Ok(self.folder_path(folder)?.join(format!("{}.json", period.key())))
    }

    /// Replaces the record for the snapshot's quarter. Empty snapshots are
    /// never written; `Ok(None)` is returned instead.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the folder name is invalid or the write
    /// fails.
    pub async fn write_snapshot(
        &self,
        folder: &str,
        snapshot: &QuarterlySnapshot,
    ) -> Result<Option<PathBuf>, StoreError> {
        if snapshot.positions.is_empty() {
            tracing::debug!(
                folder,
                quarter = %snapshot.period,
                "empty snapshot not written"
            );
            return Ok(None);
        }

        let path = self.snapshot_path(folder, snapshot.period)?;
        write_json_atomic(&path, &StoredSnapshot::from(snapshot)).await?;

        tracing::debug!(
            folder,
            quarter = %snapshot.period,
            positions = snapshot.positions.len(),
            path = %path.display(),
            "snapshot written"
        );
        Ok(Some(path))
    }

    /// Reads the record for `folder` and `period`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the folder is invalid, the file cannot be
    /// read, or it does not contain a valid record.
    pub async fn read_snapshot(
        &self,
        folder: &str,
        period: QuarterPeriod,
    ) -> Result<Option<StoredSnapshot>, StoreError> {
        let path = self.snapshot_path(folder, period)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::json(&path, e))
    }

    /// Quarters that have a record under `folder`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the folder is invalid or cannot be listed.
    pub async fn list_quarters(&self, folder: &str) -> Result<Vec<QuarterPeriod>, StoreError> {
        let dir = self.folder_path(folder)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&dir, e)),
        };

        let mut quarters = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&dir, e))?
        {
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if let Ok(period) = stem.parse::<QuarterPeriod>() {
                quarters.push(period);
            }
        }
        quarters.sort_unstable();
        Ok(quarters)
    }

    fn folder_path(&self, folder: &str) -> Result<PathBuf, StoreError> {
        if folder.is_empty() || folder.starts_with('.') || folder.contains(['/', '\\']) {
            return Err(StoreError::InvalidFolder(folder.to_owned()));
        }
        Ok(self.root.join(folder))
    }
}

#[cfg(test)]
#[path = "snapshots_test.rs"]
mod tests;
