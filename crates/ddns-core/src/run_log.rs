//! Append-only run log
//!
//! One line per run: `<local-timestamp> : <result-code> : <message>`.
//! Appending is best-effort; a failure is reported through tracing and
//! never changes the run's outcome.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::ResultCode;

/// Timestamp format of each log line
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only log of terminal outcomes
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Create a log writing to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line for the given outcome
    pub async fn append(&self, code: ResultCode, message: &str) {
        let line = format_line(Local::now(), code, message);

        let result = async {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)
                .await?;
            file.write_all(line.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = result {
            tracing::warn!("Failed to append to run log {}: {}", self.path.display(), e);
        }
    }
}

/// Render one log line, newline included
///
/// Newlines inside `message` are flattened so each run stays on one line.
pub fn format_line(at: DateTime<Local>, code: ResultCode, message: &str) -> String {
    let message = message.replace(['\r', '\n'], " ");
    format!("{} : {} : {}\n", at.format(TIMESTAMP_FORMAT), code, message)
}
