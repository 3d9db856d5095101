//! Orchestration layer
//!
//! ## Responsibilities
//!
//! The batch processor is the system's command center:
//!
//! - application lifecycle (initialize, run, write-back, final stats)
//! - loading the protection numbers from the record store
//! - concurrency control (Semaphore) and batching
//! - one navigation task per protection number, joined on completion
//! - shutdown handling (Ctrl-C stops issuing new tasks)
//!
//! ## Layer relationships
//!
//! ```text
//! orchestrator::batch_processor (Vec<ProtectionNumber>)
//!     ↓
//! workflow::PageNavigator (one protection number)
//!     ↓
//! services (extract / classify / record store / failure report)
//!     ↓
//! infrastructure (Portal, AutoThrottle)
//! ```
//!
//! No business decisions live here: the orchestrator schedules, joins and
//! counts, nothing else.

pub mod batch_processor;

pub use batch_processor::{run_batch, App, BatchOutcomes};
