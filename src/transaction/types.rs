// Core types for the Wait-Die transaction simulator.
//
// Deliberately small: this system has exclusive locks only, no
// isolation levels, no MVCC versions and no savepoints (see the
// Non-goals in the crate-level design notes).

use std::fmt;

use crate::common::TransactionId;

/// Immutable identity of a transaction, assigned once at birth.
///
/// `ts` is the logical timestamp used by Wait-Die: smaller is older.
/// Two transactions may draw the same timestamp; ties are broken in
/// favor of the younger-dies rule (see [`crate::transaction::lock_manager::wait_die_decision`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionInfo {
    pub tid: TransactionId,
    pub ts: u32,
}

impl TransactionInfo {
    pub fn new(tid: TransactionId, ts: u32) -> Self {
        Self { tid, ts }
    }

    /// Even timestamps access resources in X, Y order; odd in Y, X order.
    /// This parity split is what forces the classic AB-BA cross pattern.
    pub fn is_even(&self) -> bool {
        self.ts % 2 == 0
    }
}

impl fmt::Display for TransactionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}(ts={})", self.tid, self.ts)
    }
}

/// Lifecycle state of a [`super::worker::TransactionWorker`].
///
/// ```text
/// Ready --start--> Running --busy--> Waiting --granted--> Running
/// Running --unlock all + exit--> Committed (terminal)
/// Waiting --wait-die(die)--> Aborted (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    Ready,
    Running,
    Waiting,
    Committed,
    Aborted,
}

impl TransactionState {
    /// Committed and Aborted are the only terminal states.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Committed | TransactionState::Aborted)
    }
}

impl Default for TransactionState {
    fn default() -> Self {
        TransactionState::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_determines_access_order() {
        assert!(TransactionInfo::new(1, 10).is_even());
        assert!(!TransactionInfo::new(1, 5).is_even());
    }

    #[test]
    fn test_terminal_states() {
        assert!(TransactionState::Committed.is_terminal());
        assert!(TransactionState::Aborted.is_terminal());
        assert!(!TransactionState::Waiting.is_terminal());
    }
}
