//! File-backed persistence for reconstructed snapshots and the real-time feed.
//!
//! Every record is a pretty-printed JSON file. Writes go to a sibling
//! temporary file that is then renamed over the target, so readers only ever
//! see a complete old or complete new record.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

pub mod realtime;
pub mod records;
pub mod snapshots;

pub use realtime::{write_realtime_feed, RealtimeFeed, REALTIME_FEED_FILE};
pub use records::{StoredPosition, StoredSnapshot};
pub use snapshots::SnapshotStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode or decode {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid output folder name {0:?}")]
    InvalidFolder(String),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Serializes `value` as pretty JSON and atomically replaces `path` with it,
/// creating parent directories as needed.
///
/// # Errors
///
/// Returns [`StoreError::Json`] if serialization fails and
/// [`StoreError::Io`] if the directory, temporary file, or rename fails.
pub async fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    let mut body = serde_json::to_vec_pretty(value).map_err(|e| StoreError::json(path, e))?;
    body.push(b'\n');

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let tmp_path = temp_path_for(path);
    tokio::fs::write(&tmp_path, &body)
        .await
        .map_err(|e| StoreError::io(&tmp_path, e))?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        tokio::fs::remove_file(&tmp_path).await.ok();
        return Err(StoreError::io(path, e));
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
