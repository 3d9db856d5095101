//! Navigation task context
//!
//! Wraps "which protection number am I driving, and which position does it
//! hold in this run" for logging.

use std::fmt::Display;

use crate::models::ProtectionNumber;

/// Context for one navigation task
#[derive(Debug, Clone)]
pub struct TaskCtx {
    /// Protection number being looked up
    pub number: ProtectionNumber,

    /// Position in the batch, starting at 1 (log display only)
    pub index: usize,
}

impl TaskCtx {
    pub fn new(number: ProtectionNumber, index: usize) -> Self {
        Self { number, index }
    }
}

impl Display for TaskCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[patent {} #{}]", self.number, self.index)
    }
}
