//! # INPI Status Sync
//!
//! Batch retrieval of patent-status codes from the INPI web portal, with
//! legal-status classification and write-back into a tabular record store.
//!
//! ## Architecture
//!
//! The system uses a strict four-layer architecture:
//!
//! ### ① Infrastructure layer
//! - `infrastructure/` - owns scarce resources, exposes capabilities only
//! - `Portal` / `HttpPortal` - fetch a URL, submit a form, follow a link
//! - `AutoThrottle` - global politeness policy towards the portal
//!
//! ### ② Service layer
//! - `services/` - single-patent capabilities, no batch types
//! - `extract_status_codes` - pull status-code tokens out of a result page
//! - `classify` - map extracted codes to a legal-status verdict
//! - `RecordStore` / `CsvRecordStore` - read protection numbers, persist results
//! - `FailureWriter` - append unprocessable numbers to a report file
//!
//! ### ③ Workflow layer
//! - `workflow/` - the complete flow for one protection number
//! - `TaskCtx` - context (protection number + display index)
//! - `PageNavigator` - explicit navigation state machine
//!   (login → menu → search form → result page → code extraction)
//!
//! ### ④ Orchestration layer
//! - `orchestrator/batch_processor` - fans out one navigation task per
//!   protection number, joins on completion, classifies and writes back

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// Re-export the commonly used types.
pub use config::Config;
pub use error::{AppError, NavigationError, RecordStoreError, Result, TransportError};
pub use infrastructure::{AutoThrottle, Document, HttpPortal, Portal, SearchForm};
pub use models::{ClassificationResult, ProtectionNumber, Verdict};
pub use orchestrator::{run_batch, App, BatchOutcomes};
pub use services::{classify, extract_status_codes, CsvRecordStore, FailureWriter, RecordStore};
pub use workflow::{NavStep, PageNavigator, TaskCtx};
