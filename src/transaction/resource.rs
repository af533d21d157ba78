// Per-item resource state: holder, FIFO wait queue, condition signal.
//
// All reads and mutations of `holder`/`wait_queue` happen under a single
// mutex; the paired condvar wakes waiters when either changes.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::common::TransactionId;

/// Outcome of a non-blocking acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    Granted,
    /// The resource is unavailable; carries the current holder, if any
    /// (it may be free but FIFO-blocked behind another waiter).
    Busy(Option<TransactionId>),
}

struct ResourceState {
    holder: Option<TransactionId>,
    wait_queue: VecDeque<TransactionId>,
}

/// A single exclusively-lockable shared item (e.g. `X` or `Y`).
pub struct Resource {
    item_id: String,
    state: Mutex<ResourceState>,
    condvar: Condvar,
}

impl Resource {
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            state: Mutex::new(ResourceState {
                holder: None,
                wait_queue: VecDeque::new(),
            }),
            condvar: Condvar::new(),
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    /// Grants the lock if free and `tid` either isn't queued or heads
    /// the queue (I1-I3: no duplicate waiters, holder never queued).
    pub fn try_acquire(&self, tid: TransactionId) -> AcquireOutcome {
        let mut state = self.state.lock();

        let fifo_clear = state.wait_queue.is_empty() || state.wait_queue[0] == tid;
        if state.holder.is_none() && fifo_clear {
            state.holder = Some(tid);
            state.wait_queue.retain(|&t| t != tid);
            drop(state);
            self.condvar.notify_all();
            return AcquireOutcome::Granted;
        }

        AcquireOutcome::Busy(state.holder)
    }

    /// Appends `tid` to the wait queue unless it's already there (I3).
    pub fn enqueue_waiter(&self, tid: TransactionId) {
        let mut state = self.state.lock();
        if !state.wait_queue.contains(&tid) {
            state.wait_queue.push_back(tid);
        }
    }

    /// Releases the lock if `tid` is the current holder. A no-op
    /// otherwise, so a racing abort can never double-release someone
    /// else's lock (design note: release must be idempotent).
    pub fn release(&self, tid: TransactionId) {
        let mut state = self.state.lock();
        if state.holder == Some(tid) {
            state.holder = None;
            drop(state);
            self.condvar.notify_all();
        }
    }

    /// Removes `tid` from the wait queue and clears it as holder if it
    /// happens to hold the lock. Used by the abort procedure, which
    /// must leave no trace of the dying transaction behind (P4, P5).
    pub fn forget(&self, tid: TransactionId) {
        let mut state = self.state.lock();
        state.wait_queue.retain(|&t| t != tid);
        if state.holder == Some(tid) {
            state.holder = None;
            drop(state);
            self.condvar.notify_all();
        }
    }

    pub fn is_holder(&self, tid: TransactionId) -> bool {
        self.state.lock().holder == Some(tid)
    }

    pub fn holder(&self) -> Option<TransactionId> {
        self.state.lock().holder
    }

    /// Blocks on the condvar for at most `timeout`, then returns so the
    /// caller can re-poll `try_acquire` and the deadlock predicate.
    /// Spurious wakeups are harmless: the caller loops.
    pub fn wait_for(&self, timeout: Duration) {
        let mut state = self.state.lock();
        self.condvar.wait_for(&mut state, timeout);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_resource_grants_immediately() {
        let r = Resource::new("X");
        assert_eq!(r.try_acquire(1), AcquireOutcome::Granted);
        assert!(r.is_holder(1));
    }

    #[test]
    fn test_busy_resource_reports_holder() {
        let r = Resource::new("X");
        r.try_acquire(1);
        assert_eq!(r.try_acquire(2), AcquireOutcome::Busy(Some(1)));
    }

    #[test]
    fn test_fifo_head_gets_priority_over_latecomer() {
        let r = Resource::new("X");
        r.try_acquire(1);
        r.enqueue_waiter(2);
        r.release(1);
        // tid 3 never enqueued; must not jump the queue ahead of 2.
        assert_eq!(r.try_acquire(3), AcquireOutcome::Busy(None));
        assert_eq!(r.try_acquire(2), AcquireOutcome::Granted);
    }

    #[test]
    fn test_release_by_non_holder_is_noop() {
        let r = Resource::new("X");
        r.try_acquire(1);
        r.release(2);
        assert!(r.is_holder(1));
    }

    #[test]
    fn test_forget_clears_both_holder_and_queue() {
        let r = Resource::new("X");
        r.try_acquire(1);
        r.enqueue_waiter(2);
        r.forget(1);
        assert_eq!(r.holder(), None);
        r.forget(2);
        assert_eq!(r.try_acquire(3), AcquireOutcome::Granted);
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let r = Resource::new("X");
        r.try_acquire(1);
        r.enqueue_waiter(2);
        r.enqueue_waiter(2);
        r.release(1);
        assert_eq!(r.try_acquire(2), AcquireOutcome::Granted);
    }
}
