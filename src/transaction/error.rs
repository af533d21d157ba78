//! Transaction-specific error types.
//!
//! The lock manager's only structured failure is an abort: a younger
//! requester loses Wait-Die arbitration and must unwind. Everything
//! else (spurious wakeups, poll timeouts) is handled in the wait loop
//! and never surfaces as an error.

use thiserror::Error;

use crate::common::TransactionId;

/// Result type alias for transaction operations.
pub type TransactionResult<T> = std::result::Result<T, TransactionError>;

#[derive(Debug, Error)]
pub enum TransactionError {
    /// Wait-Die arbitration killed this transaction while it waited
    /// for a lock. Carries the victim's id for logging.
    #[error("transaction {0} aborted by wait-die arbitration")]
    Aborted(TransactionId),

    /// Unexpected internal failure. Treated as fatal for the worker
    /// that raised it; never propagates past the worker boundary.
    #[error("internal lock manager error: {0}")]
    Internal(String),
}

impl TransactionError {
    pub fn is_abort(&self) -> bool {
        matches!(self, TransactionError::Aborted(_))
    }
}
