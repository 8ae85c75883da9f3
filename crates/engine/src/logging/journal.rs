//! Append-only JSON-lines journal files.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::error::JournalError;

/// Directory of `.jsonl` files, one JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonlJournal {
    directory: PathBuf,
}

impl JsonlJournal {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Append one entry to `file_name`, creating the directory and file on demand.
    pub async fn append<T: Serialize>(&self, file_name: &str, entry: &T) -> Result<(), JournalError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        tokio::fs::create_dir_all(&self.directory).await?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.directory.join(file_name))
            .await?;
        // Single write per entry so concurrent appends never interleave within a line.
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read every entry of `file_name`; a missing file reads as empty.
    #[cfg(test)]
    pub(crate) async fn read_all<T: serde::de::DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>, JournalError> {
        let path = self.directory.join(file_name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(JournalError::from))
            .collect()
    }
}
