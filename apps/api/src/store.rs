//! Job hand-off store: the CSV file the search stage writes and the analyzer reads back.
//!
//! Each request gets its own temporary file inside the configured work directory, so
//! concurrent requests never share a hand-off file. The file is removed when the store drops.

use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::task::{spawn_blocking, JoinError};
use tracing::debug;

use crate::models::job::JobRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store task failed: {0}")]
    Task(#[from] JoinError),
}

/// File I/O runs on the blocking pool; only the final unlink on drop happens inline.
pub struct JobStore {
    file: NamedTempFile,
}

impl JobStore {
    /// Creates an empty hand-off file in `dir`.
    pub async fn create_in(dir: &Path) -> Result<Self, StoreError> {
        let dir = dir.to_path_buf();
        let file = spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix("scraped-jobs-")
                .suffix(".csv")
                .tempfile_in(dir)
        })
        .await??;
        debug!("Job store created at {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Replaces the file contents with `records`, header first.
    pub async fn write(&self, records: &[JobRecord]) -> Result<(), StoreError> {
        let path = self.path().to_path_buf();
        let records = records.to_vec();
        spawn_blocking(move || write_csv(&path, &records)).await?
    }

    pub async fn read(&self) -> Result<Vec<JobRecord>, StoreError> {
        let path = self.path().to_path_buf();
        spawn_blocking(move || read_csv(&path)).await?
    }
}

fn write_csv(path: &Path, records: &[JobRecord]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_csv(path: &Path) -> Result<Vec<JobRecord>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize::<JobRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}
