// One worker per simulated transaction: runs the fixed two-resource
// access schedule, asking the shared lock manager for each lock in
// turn and releasing everything on the way out, win or lose.
//
// Access order is derived from the transaction's timestamp parity
// (even ts -> X then Y, odd ts -> Y then X) so that roughly half the
// population provokes the classic AB-BA cross pattern against the
// other half.

use std::ops::Range;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::{error, info};

use crate::transaction::error::TransactionResult;
use crate::transaction::lock_manager::LockManager;
use crate::transaction::types::TransactionInfo;

/// Default bounds of the random think-time injected between each step
/// of the schedule, matching `spec.md` §6's stated default delay range
/// of [0.1, 1.0] s.
pub const DEFAULT_DELAY_RANGE_MS: Range<u64> = 100..1000;

pub struct TransactionWorker {
    info: TransactionInfo,
    lock_manager: Arc<LockManager>,
    items: (String, String),
    delay_range_ms: Range<u64>,
}

impl TransactionWorker {
    pub fn new(info: TransactionInfo, lock_manager: Arc<LockManager>, items: (String, String)) -> Self {
        Self::with_delay_range(info, lock_manager, items, DEFAULT_DELAY_RANGE_MS)
    }

    pub fn with_delay_range(
        info: TransactionInfo,
        lock_manager: Arc<LockManager>,
        items: (String, String),
        delay_range_ms: Range<u64>,
    ) -> Self {
        Self {
            info,
            lock_manager,
            items,
            delay_range_ms,
        }
    }

    /// The fixed access schedule: lock first item, hold a beat, lock
    /// second item, hold a beat, release both in the same order they
    /// were acquired. Any abort along the way unwinds what's already
    /// held and returns.
    pub fn run(self) -> TransactionResult<()> {
        let (first, second) = if self.info.is_even() {
            (self.items.0.clone(), self.items.1.clone())
        } else {
            (self.items.1.clone(), self.items.0.clone())
        };

        info!(transaction = self.info.tid, ts = self.info.ts, "[BEGIN] {}", self.info);

        let result = self.execute(&first, &second);

        match &result {
            Ok(()) => info!(transaction = self.info.tid, "[COMMIT] {}", self.info),
            Err(err) => error!(transaction = self.info.tid, "[ABORT] {} ({err})", self.info),
        }

        // Unconditional: commit releases its own locks as it goes, but
        // scrubbing again here is a no-op for a clean commit and is
        // the only cleanup path for an abort (P4, P5 — idempotent).
        self.lock_manager.release_all(self.info.tid);

        result
    }

    fn execute(&self, first: &str, second: &str) -> TransactionResult<()> {
        self.lock_manager.lock(self.info.tid, first)?;
        self.think();

        self.lock_manager.lock(self.info.tid, second)?;
        self.think();

        self.lock_manager.unlock(self.info.tid, first);
        self.lock_manager.unlock(self.info.tid, second);
        Ok(())
    }

    fn think(&self) {
        let delay = rand::rng().random_range(self.delay_range_ms.clone());
        thread::sleep(Duration::from_millis(delay));
    }
}
