//! Backing store for location records

use crate::locations::types::RawLocation;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by a location store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read location file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse location file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of raw location records. The cache only ever performs full loads,
/// so a single operation is enough.
#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn load(&self) -> Result<Vec<RawLocation>, StoreError>;
}

/// Reads location records from a JSON file on disk.
pub struct FileLocationStore {
    path: PathBuf,
}

impl FileLocationStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl LocationStore for FileLocationStore {
    async fn load(&self) -> Result<Vec<RawLocation>, StoreError> {
        let data = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_store_loads_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"location": "45.0,20.0", "as": "AS1", "asname": "one"}},
                {{"location": "50.0,10.0", "as": "AS2", "asname": "two", "details": "dc"}}]"#
        )
        .unwrap();

        let store = FileLocationStore::new(file.path());
        let records = store.load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].as_label, "AS1");
        assert_eq!(records[1].details, "dc");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let store = FileLocationStore::new("/nonexistent/locations.json");
        assert!(matches!(store.load().await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let store = FileLocationStore::new(file.path());
        assert!(matches!(store.load().await, Err(StoreError::Parse(_))));
    }
}
