// # File State Store
//
// Plain-text implementation of StateStore.
//
// ## File Format
//
// The file holds the last successfully applied IP and nothing else:
//
// ```text
// 203.0.113.5
// ```
//
// ## Failure Behavior
//
// - Missing file: no prior record
// - Unreadable file: no prior record (never equal to any resolved IP)
// - Writes go to a temporary sibling first, then rename over the record,
//   so a crash mid-write never leaves a truncated IP behind

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::state_store::StateStore;

/// File-based last-known IP store
///
/// # Example
///
/// ```rust,no_run
/// use ddns_core::state::FileStateStore;
/// use ddns_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStateStore::new("/tmp/ddns_linode.lastip");
///
///     store.save_last_ip("203.0.113.5").await?;
///     assert_eq!(store.load_last_ip().await.as_deref(), Some("203.0.113.5"));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Create a store backed by `path`; nothing is touched until first use
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the record file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load_last_ip(&self) -> Option<String> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let ip = content.trim();
                if ip.is_empty() {
                    tracing::debug!("Last-known IP file is empty: {}", self.path.display());
                    None
                } else {
                    Some(ip.to_string())
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No last-known IP file: {}", self.path.display());
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read last-known IP file {}: {}. Treating as no prior record.",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    async fn save_last_ip(&self, ip: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::state_store(format!(
                        "Failed to create state directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(ip.as_bytes()).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Last-known IP written to {}", self.path.display());
        Ok(())
    }
}
