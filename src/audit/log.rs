//! Persisted request log
//!
//! The log file holds a single JSON array of every record written so far.
//! Each append re-reads, extends, and rewrites the whole array under one
//! process-wide lock, so writes are O(n) in the number of historical
//! records. Acceptable at this volume; callers must not put this on a hot
//! path with unbounded history.

use crate::audit::record::AuditRecord;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::warn;

const LOG_FILE_NAME: &str = "requests.log";

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("request log IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request log serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Append-only request log backed by a single JSON file.
pub struct RequestAuditLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RequestAuditLog {
    /// Creates the log directory if needed and returns a log writing to
    /// `<directory>/requests.log`.
    pub fn new(directory: impl AsRef<Path>) -> Result<Self, AuditError> {
        let directory = directory.as_ref();
        std::fs::create_dir_all(directory)?;
        Ok(Self {
            path: directory.join(LOG_FILE_NAME),
            lock: Mutex::new(()),
        })
    }

    /// Appends a record. Failures are logged and swallowed so an audit
    /// problem never fails the request it belongs to.
    pub async fn record(&self, record: AuditRecord) {
        if let Err(err) = self.append(record).await {
            warn!(error = %err, path = %self.path.display(), "failed to write request log");
        }
    }

    async fn append(&self, record: AuditRecord) -> Result<(), AuditError> {
        let _guard = self.lock.lock().await;

        let mut records = self.read_all().await?;
        records.push(record);

        let mut buf = Vec::with_capacity(records.len() * 256);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut serializer)?;

        tokio::fs::write(&self.path, buf).await?;
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<AuditRecord>, AuditError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) if data.is_empty() => Ok(Vec::new()),
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn sample_record(path: &str) -> AuditRecord {
        AuditRecord {
            timestamp: "2026-08-07T12:00:00Z".to_string(),
            method: "GET".to_string(),
            path: path.to_string(),
            query: String::new(),
            user_agent: "test".to_string(),
            remote_addr: "127.0.0.1:1".to_string(),
            x_forwarded_for: "N/A".to_string(),
            referer: String::new(),
        }
    }

    async fn read_log(dir: &Path) -> Vec<AuditRecord> {
        let data = tokio::fs::read(dir.join(LOG_FILE_NAME)).await.unwrap();
        serde_json::from_slice(&data).unwrap()
    }

    #[tokio::test]
    async fn test_records_accumulate_in_call_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestAuditLog::new(dir.path()).unwrap();

        for i in 0..5 {
            log.record(sample_record(&format!("/page/{i}"))).await;
        }

        let records = read_log(dir.path()).await;
        assert_eq!(records.len(), 5);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.path, format!("/page/{i}"));
        }
    }

    #[tokio::test]
    async fn test_records_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestAuditLog::new(dir.path()).unwrap();

        let record = sample_record("/proxy/tiles/osm/1/2/3.png");
        log.record(record.clone()).await;

        let records = read_log(dir.path()).await;
        assert_eq!(records, vec![record]);
    }

    #[tokio::test]
    async fn test_empty_existing_file_is_treated_as_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join(LOG_FILE_NAME), b"")
            .await
            .unwrap();

        let log = RequestAuditLog::new(dir.path()).unwrap();
        log.record(sample_record("/hz")).await;

        assert_eq!(read_log(dir.path()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_writers_lose_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(RequestAuditLog::new(dir.path()).unwrap());

        let mut handles = Vec::new();
        for i in 0..16 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                log.record(sample_record(&format!("/concurrent/{i}"))).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let records = read_log(dir.path()).await;
        assert_eq!(records.len(), 16);

        let mut paths: Vec<_> = records.into_iter().map(|r| r.path).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 16);
    }

    #[tokio::test]
    async fn test_unwritable_directory_never_panics() {
        let dir = tempfile::tempdir().unwrap();
        let log = RequestAuditLog::new(dir.path()).unwrap();

        // Remove the directory out from under the log; record must swallow
        // the failure.
        tokio::fs::remove_dir_all(dir.path()).await.unwrap();
        log.record(sample_record("/hz")).await;
    }
}
