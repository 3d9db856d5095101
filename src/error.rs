use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Network / transport errors
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// Page-shape mismatches during portal navigation
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),
    /// Read/write failures on the record store
    #[error("record store error: {0}")]
    RecordStore(#[from] RecordStoreError),
    /// The task was never started because shutdown was requested
    #[error("task cancelled before it was started")]
    Cancelled,
    /// The spawned task itself failed (panic or abort)
    #[error("task execution failed: {0}")]
    TaskFailed(String),
}

/// Network / transport errors
///
/// Any portal call may fail with one of these; they are surfaced per task and
/// never abort the batch.
#[derive(Debug, Error)]
pub enum TransportError {
    /// A URL could not be parsed or resolved
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The request itself failed (connection, timeout, body read)
    #[error("request to {url} failed: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The portal answered with a non-success status
    #[error("{url} answered with HTTP {status}")]
    BadStatus { url: String, status: u16 },
}

/// Selector/page-shape mismatches, terminal for the affected task
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The entry page carries no patent-services menu link
    #[error("menu link not found on {url}")]
    MissingMenuLink { url: String },
    /// The menu page carries no submittable search form
    #[error("search form not found on {url}")]
    FormNotFound { url: String },
    /// The search response carries no result link
    #[error("details link not found on {url}")]
    MissingDetailsLink { url: String },
}

/// Read/write failures on the external record store
#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("failed to open {path}: {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: csv::Error,
    },
    /// The key column is missing from the file header
    #[error("column '{column}' not found in {path}")]
    MissingKeyColumn { path: String, column: String },
}

/// Application result type
pub type Result<T> = std::result::Result<T, AppError>;
