//! Append-only attendance log.
//!
//! The log is opened once, in append mode, and kept open for the lifetime of
//! the process. Every record is written, flushed and synced before `append`
//! returns, so an event that was appended survives a crash right after.

use crate::error::{StorageError, StorageResult};
use crate::record::{format_record, parse_record};
use rollcall_core::AttendeeData;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};

/// Append-only CSV sink for attendance events.
///
/// # Example
///
/// ```no_run
/// use rollcall_core::{AttendeeData, CardId};
/// use rollcall_storage::AttendanceLog;
///
/// # async fn example() -> rollcall_storage::StorageResult<()> {
/// let mut log = AttendanceLog::open("attendeeLog.csv").await?;
/// log.append(&AttendeeData::new(CardId::new(6656))).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AttendanceLog {
    path: PathBuf,
    file: File,
    appended: u64,
}

impl AttendanceLog {
    /// Open `path` for appending, creating it if it does not exist.
    ///
    /// # Errors
    /// Returns `StorageError::Io` if the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| StorageError::io(&path, e))?;

        info!(path = %path.display(), "Attendance log opened");
        Ok(Self {
            path,
            file,
            appended: 0,
        })
    }

    /// Append one record and sync it to disk.
    ///
    /// # Errors
    /// Returns `StorageError::Io` if the write or the sync fails. The record
    /// may then be partially written.
    pub async fn append(&mut self, event: &AttendeeData) -> StorageResult<()> {
        let mut line = format_record(event);
        line.push('\n');

        self.file
            .write_all(line.as_bytes())
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        self.file
            .flush()
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        self.file
            .sync_data()
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;

        self.appended += 1;
        debug!(path = %self.path.display(), attendee_id = %event.attendee_id(), "Record appended");
        Ok(())
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records appended through this handle.
    pub fn appended(&self) -> u64 {
        self.appended
    }
}

/// Read every record of the log at `path`, skipping blank lines.
///
/// # Errors
/// Returns `StorageError::Io` if the file cannot be read and
/// `StorageError::InvalidRecord` on the first malformed line.
pub async fn read_records(path: impl AsRef<Path>) -> StorageResult<Vec<AttendeeData>> {
    let path = path.as_ref();
    let file = File::open(path).await.map_err(|e| StorageError::io(path, e))?;
    let mut lines = BufReader::new(file).lines();

    let mut records = Vec::new();
    let mut line_no = 0;
    while let Some(line) = lines.next_line().await.map_err(|e| StorageError::io(path, e))? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_record(&line).map_err(|reason| StorageError::InvalidRecord {
            line: line_no,
            reason,
        })?;
        records.push(record);
    }
    Ok(records)
}
