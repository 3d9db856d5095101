//! Failure report service - service layer
//!
//! Only knows how to append one failed protection number to the report file;
//! not aware of the batch or of why classification is run.

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::models::ProtectionNumber;

/// Appends unprocessable protection numbers to a plain-text report
pub struct FailureWriter {
    report_path: String,
}

impl FailureWriter {
    pub fn new() -> Self {
        Self {
            report_path: "failures.txt".to_string(),
        }
    }

    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            report_path: path.into(),
        }
    }

    /// Append one failure line
    pub async fn write(&self, number: &ProtectionNumber, reason: &str) -> Result<()> {
        debug!("recording failure: {} | {}", number, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.report_path)?;

        let line = format!("{} | {}\n", number, reason);
        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

impl Default for FailureWriter {
    fn default() -> Self {
        Self::new()
    }
}
