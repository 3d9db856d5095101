pub mod classifier;
pub mod extractor;
pub mod failure_writer;
pub mod record_store;

pub use classifier::classify;
pub use extractor::extract_status_codes;
pub use failure_writer::FailureWriter;
pub use record_store::{CsvRecordStore, RecordStore};
