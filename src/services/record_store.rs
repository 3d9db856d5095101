//! Record store - service layer
//!
//! The tabular store the batch reads protection numbers from and persists
//! classifications into. `CsvRecordStore` is the file-backed implementation:
//! it loads the whole sheet up front, applies writes in memory and rewrites
//! the file on `flush`, preserving every column it does not own.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::RecordStoreError;
use crate::models::{ClassificationResult, ProtectionNumber};

/// Column holding the protection numbers
pub const KEY_COLUMN: &str = "Nº DA PROTEÇÃO";

/// Columns written by the classification
pub const STATUS_COLUMN: &str = "STATUS";
pub const DESPACHO_COLUMN: &str = "DESPACHO";
pub const ANALISE_COLUMN: &str = "ANÁLISE SUBSTANTIVA";

/// Tabular store keyed by the protection-number column
pub trait RecordStore: Send {
    /// All protection numbers, in row order; rows with a blank key are skipped
    fn read_all(&self) -> Result<Vec<ProtectionNumber>, RecordStoreError>;

    /// Persist one classification into the matching row(s)
    fn write(
        &mut self,
        number: &ProtectionNumber,
        result: &ClassificationResult,
    ) -> Result<(), RecordStoreError>;

    /// Flush pending writes to the backing file
    fn flush(&mut self) -> Result<(), RecordStoreError>;
}

/// CSV-backed record store
#[derive(Debug)]
pub struct CsvRecordStore {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    key_idx: usize,
}

impl CsvRecordStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordStoreError> {
        let path = path.as_ref().to_path_buf();
        let display = path.display().to_string();

        let mut reader =
            csv::Reader::from_path(&path).map_err(|e| RecordStoreError::OpenFailed {
                path: display.clone(),
                source: e,
            })?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| RecordStoreError::ReadFailed {
                path: display.clone(),
                source: e,
            })?
            .iter()
            .map(String::from)
            .collect();

        let key_idx = headers
            .iter()
            .position(|h| h.trim() == KEY_COLUMN)
            .ok_or_else(|| RecordStoreError::MissingKeyColumn {
                path: display.clone(),
                column: KEY_COLUMN.to_string(),
            })?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| RecordStoreError::ReadFailed {
                path: display.clone(),
                source: e,
            })?;
            let mut row: Vec<String> = record.iter().map(String::from).collect();
            // Trailing blank cells are sometimes dropped by exporters
            if row.len() < headers.len() {
                row.resize(headers.len(), String::new());
            }
            rows.push(row);
        }

        Ok(Self {
            path,
            headers,
            rows,
            key_idx,
        })
    }

    /// Index of `name`, adding the column (and padding all rows) if absent
    fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.headers.iter().position(|h| h.trim() == name) {
            return idx;
        }
        self.headers.push(name.to_string());
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
        width - 1
    }
}

impl RecordStore for CsvRecordStore {
    fn read_all(&self) -> Result<Vec<ProtectionNumber>, RecordStoreError> {
        Ok(self
            .rows
            .iter()
            .filter_map(|row| ProtectionNumber::new(row.get(self.key_idx)?))
            .collect())
    }

    fn write(
        &mut self,
        number: &ProtectionNumber,
        result: &ClassificationResult,
    ) -> Result<(), RecordStoreError> {
        let status_idx = self.ensure_column(STATUS_COLUMN);
        let despacho_idx = self.ensure_column(DESPACHO_COLUMN);
        let analise_idx = self.ensure_column(ANALISE_COLUMN);

        let key_idx = self.key_idx;
        let mut matched = 0usize;
        for row in &mut self.rows {
            if row.get(key_idx).map(|k| k.trim()) != Some(number.as_str()) {
                continue;
            }
            row[status_idx] = result.verdict.label().to_string();
            row[despacho_idx] = result.despacho_text();
            row[analise_idx] = result.analise_text();
            matched += 1;
        }

        if matched == 0 {
            warn!("⚠️ no row found for protection {}", number);
        } else {
            info!("updated protection {} ({} row(s))", number, matched);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RecordStoreError> {
        let display = self.path.display().to_string();
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| RecordStoreError::WriteFailed {
                path: display.clone(),
                source: e,
            })?;

        writer
            .write_record(&self.headers)
            .map_err(|e| RecordStoreError::WriteFailed {
                path: display.clone(),
                source: e,
            })?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| RecordStoreError::WriteFailed {
                    path: display.clone(),
                    source: e,
                })?;
        }
        writer.flush().map_err(|e| RecordStoreError::WriteFailed {
            path: display,
            source: csv::Error::from(e),
        })?;
        Ok(())
    }
}
