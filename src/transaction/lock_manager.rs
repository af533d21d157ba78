// Wait-Die lock acquisition policy, layered on top of the per-resource
// FIFO queues in `resource` and the shared `wfg`.
//
// This is the only place the Rosenkrantz/Stearns/Lewis rule is
// evaluated: an older requester (smaller timestamp) is allowed to wait
// for a younger holder; anyone else dies rather than risk a cycle.
// Non-preemptive, no restart: a died transaction unwinds and exits.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::common::TransactionId;
use crate::transaction::error::{TransactionError, TransactionResult};
use crate::transaction::resource::{AcquireOutcome, Resource};
use crate::transaction::types::TransactionInfo;
use crate::transaction::wfg::WaitForGraph;

/// Default interval a waiter sleeps on the resource's condvar between
/// re-checks of the wait-die predicate and the wait-for graph. Not a
/// deadline: the wait itself is unbounded, bounded only by the
/// protocol resolving the cycle that would otherwise form. Chosen in
/// the middle of `spec.md` §6's suggested 100-500ms band.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Owns the resource table and the wait-for graph, and arbitrates
/// every lock request against the timestamps of the transactions
/// directory handed to it at construction.
pub struct LockManager {
    resources: HashMap<String, Resource>,
    wfg: WaitForGraph,
    directory: HashMap<TransactionId, TransactionInfo>,
    poll_interval: Duration,
}

impl LockManager {
    pub fn new(items: impl IntoIterator<Item = String>, directory: HashMap<TransactionId, TransactionInfo>) -> Self {
        Self::with_poll_interval(items, directory, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(
        items: impl IntoIterator<Item = String>,
        directory: HashMap<TransactionId, TransactionInfo>,
        poll_interval: Duration,
    ) -> Self {
        let resources = items.into_iter().map(|id| (id.clone(), Resource::new(id))).collect();
        Self {
            resources,
            wfg: WaitForGraph::new(),
            directory,
            poll_interval,
        }
    }

    fn resource(&self, item: &str) -> &Resource {
        self.resources
            .get(item)
            .unwrap_or_else(|| panic!("unknown resource item `{item}`"))
    }

    fn info(&self, tid: TransactionId) -> TransactionInfo {
        *self
            .directory
            .get(&tid)
            .unwrap_or_else(|| panic!("unknown transaction {tid}"))
    }

    /// Blocks until `tid` holds `item` exclusively, or returns
    /// `Err(Aborted)` if Wait-Die kills it first. On success the
    /// resource is held and the wait-for graph has no outgoing edge
    /// for `tid`; on abort every trace of `tid` has been scrubbed.
    pub fn lock(&self, tid: TransactionId, item: &str) -> TransactionResult<()> {
        let resource = self.resource(item);
        let requester = self.info(tid);

        loop {
            match resource.try_acquire(tid) {
                AcquireOutcome::Granted => {
                    self.wfg.remove_outgoing(tid);
                    info!(transaction = tid, item, "[LOCK] granted");
                    return Ok(());
                }
                AcquireOutcome::Busy(holder) => {
                    if let Some(holder_tid) = holder {
                        let holder_info = self.info(holder_tid);
                        if !wait_die_decision(requester, holder_info) {
                            warn!(
                                transaction = tid,
                                item,
                                holder = holder_tid,
                                "[WAIT-DIE] younger requester dies rather than wait"
                            );
                            self.wfg.remove_node(tid);
                            return Err(TransactionError::Aborted(tid));
                        }
                        debug!(
                            transaction = tid,
                            item, holder = holder_tid, "[WAIT-DIE] older requester waits"
                        );
                        self.wfg.add_edge(tid, holder_tid);
                    }

                    resource.enqueue_waiter(tid);

                    if self.wfg.cycles_containing(tid) {
                        warn!(transaction = tid, item, "[DEADLOCK] cycle detected, aborting");
                        resource.forget(tid);
                        self.wfg.remove_node(tid);
                        return Err(TransactionError::Aborted(tid));
                    }

                    resource.wait_for(self.poll_interval);
                }
            }
        }
    }

    /// Releases `item` if held by `tid`. Idempotent (P5): calling this
    /// for a resource `tid` never held is a harmless no-op.
    pub fn unlock(&self, tid: TransactionId, item: &str) {
        self.resource(item).release(tid);
        info!(transaction = tid, item, "[UNLOCK]");
    }

    /// Scrubs `tid` from every resource's holder/queue slot and from
    /// the wait-for graph. Called once, on abort or commit exit, so a
    /// terminated transaction leaves nothing behind for others to wait
    /// on (I5, P4).
    pub fn release_all(&self, tid: TransactionId) {
        for resource in self.resources.values() {
            resource.forget(tid);
        }
        self.wfg.remove_node(tid);
    }

    pub fn wfg(&self) -> &WaitForGraph {
        &self.wfg
    }
}

/// The Wait-Die predicate: may `requester` wait for the resource held
/// by `holder`? True ("wait") iff the requester is strictly older
/// (smaller timestamp). Equal timestamps resolve to "die" — the
/// original source treats ties as the younger-loses case, and a tie
/// can never legitimately occur twice for the same pair once one side
/// has died, so there's no fairness cost to breaking it this way.
pub fn wait_die_decision(requester: TransactionInfo, holder: TransactionInfo) -> bool {
    requester.ts < holder.ts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(tid: TransactionId, ts: u32) -> TransactionInfo {
        TransactionInfo::new(tid, ts)
    }

    fn directory(pairs: &[(TransactionId, u32)]) -> HashMap<TransactionId, TransactionInfo> {
        pairs.iter().map(|&(tid, ts)| (tid, info(tid, ts))).collect()
    }

    #[test]
    fn test_older_requester_waits() {
        assert!(wait_die_decision(info(1, 10), info(2, 20)));
    }

    #[test]
    fn test_younger_requester_dies() {
        assert!(!wait_die_decision(info(1, 20), info(2, 10)));
    }

    #[test]
    fn test_equal_timestamps_die() {
        assert!(!wait_die_decision(info(1, 15), info(2, 15)));
    }

    #[test]
    fn test_uncontended_lock_is_granted() {
        let lm = LockManager::new(["X".to_string()], directory(&[(1, 10)]));
        assert!(lm.lock(1, "X").is_ok());
        assert!(lm.resource("X").is_holder(1));
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let lm = LockManager::new(["X".to_string()], directory(&[(1, 10)]));
        lm.unlock(1, "X");
        lm.lock(1, "X").unwrap();
        lm.unlock(1, "X");
        lm.unlock(1, "X");
        assert_eq!(lm.resource("X").holder(), None);
    }

    #[test]
    fn test_release_all_clears_every_resource() {
        let lm = LockManager::new(["X".to_string(), "Y".to_string()], directory(&[(1, 10)]));
        lm.lock(1, "X").unwrap();
        lm.lock(1, "Y").unwrap();
        lm.release_all(1);
        assert_eq!(lm.resource("X").holder(), None);
        assert_eq!(lm.resource("Y").holder(), None);
    }

    #[test]
    fn test_younger_requester_aborts_instead_of_queueing() {
        let lm = LockManager::new(["X".to_string()], directory(&[(1, 20), (2, 10)]));
        lm.lock(2, "X").unwrap();
        let result = lm.lock(1, "X");
        assert!(matches!(result, Err(TransactionError::Aborted(1))));
        assert!(!lm.resource("X").is_holder(1));
    }

    #[test]
    fn test_default_poll_interval_is_within_spec_band() {
        assert!(DEFAULT_POLL_INTERVAL >= Duration::from_millis(100));
        assert!(DEFAULT_POLL_INTERVAL <= Duration::from_millis(500));
    }

    #[test]
    fn test_with_poll_interval_is_honored() {
        let lm = LockManager::with_poll_interval(
            ["X".to_string()],
            directory(&[(1, 10)]),
            Duration::from_millis(5),
        );
        assert!(lm.lock(1, "X").is_ok());
    }
}
