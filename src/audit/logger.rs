//! Append-only audit logger
//!
//! Records are written as line-delimited JSON (JSONL), one complete
//! object per line, flushed per write. The log is never rewritten.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};

use super::entry::AuditRecord;

/// Writes and reads the JSONL audit log
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    /// Create a new AuditLogger for the given path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one record to the log
    pub fn append(&self, record: &AuditRecord) -> LedgerResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(record)
            .map_err(|e| LedgerError::Json(format!("Failed to serialize audit record: {}", e)))?;

        writeln!(file, "{}", json)
            .map_err(|e| LedgerError::Io(format!("Failed to write audit record: {}", e)))?;

        file.flush()
            .map_err(|e| LedgerError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all records in chronological (file) order
    ///
    /// Sorting for display is the caller's concern.
    pub fn read_all(&self) -> LedgerResult<Vec<AuditRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                LedgerError::Io(format!(
                    "Failed to read audit log line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let record: AuditRecord = serde_json::from_str(&line).map_err(|e| {
                LedgerError::Json(format!(
                    "Failed to parse audit record at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            records.push(record);
        }

        Ok(records)
    }

    /// Read the most recent N records
    pub fn read_recent(&self, count: usize) -> LedgerResult<Vec<AuditRecord>> {
        let all = self.read_all()?;
        let start = all.len().saturating_sub(count);
        Ok(all[start..].to_vec())
    }

    /// Number of records in the log
    pub fn record_count(&self) -> LedgerResult<usize> {
        Ok(self.read_all()?.len())
    }

    /// Check if the log file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Path to the log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}
