// Builds the transaction population, wires up the shared lock
// manager, and runs every worker to completion.
//
// This replaces a general-purpose transaction manager: there's no
// client-facing begin/commit API here, only a one-shot simulation run
// driven entirely by its own configuration.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::common::TransactionId;
use crate::transaction::lock_manager::{LockManager, DEFAULT_POLL_INTERVAL};
use crate::transaction::types::TransactionInfo;
use crate::transaction::worker::{TransactionWorker, DEFAULT_DELAY_RANGE_MS};

/// Tunables for a simulation run. Defaults mirror the system this was
/// modeled on: ten transactions contending for two resources.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub transaction_count: u32,
    pub items: (String, String),
    pub timestamp_range: std::ops::RangeInclusive<u32>,
    /// Bounds (in milliseconds) of the randomised think-time between
    /// each step of a worker's access schedule.
    pub delay_range_ms: Range<u64>,
    /// How long a blocked worker sleeps on a resource's condvar
    /// between re-checks of the wait-die predicate and the WFG.
    pub poll_interval: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            transaction_count: 10,
            items: ("X".to_string(), "Y".to_string()),
            timestamp_range: 1..=1000,
            delay_range_ms: DEFAULT_DELAY_RANGE_MS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Outcome tally for one simulation run, reported at shutdown.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub committed: Vec<TransactionId>,
    pub aborted: Vec<TransactionId>,
}

pub struct Coordinator {
    config: CoordinatorConfig,
}

impl Coordinator {
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    /// Samples a timestamp per transaction, builds the shared lock
    /// manager and directory, spawns one worker thread per
    /// transaction, and blocks until every worker has exited.
    pub fn run(&self) -> RunSummary {
        let directory = self.build_directory();
        let lock_manager = Arc::new(LockManager::with_poll_interval(
            [self.config.items.0.clone(), self.config.items.1.clone()],
            directory.clone(),
            self.config.poll_interval,
        ));

        info!(
            count = self.config.transaction_count,
            items = ?self.config.items,
            "[COORDINATOR] starting simulation"
        );

        let handles: Vec<_> = directory
            .values()
            .copied()
            .map(|info| {
                let lm = Arc::clone(&lock_manager);
                let items = self.config.items.clone();
                let delay_range_ms = self.config.delay_range_ms.clone();
                thread::spawn(move || {
                    let tid = info.tid;
                    let outcome = TransactionWorker::with_delay_range(info, lm, items, delay_range_ms).run();
                    (tid, outcome.is_ok())
                })
            })
            .collect();

        let mut summary = RunSummary::default();
        for handle in handles {
            match handle.join() {
                Ok((tid, true)) => summary.committed.push(tid),
                Ok((tid, false)) => summary.aborted.push(tid),
                Err(_) => info!("[COORDINATOR] a worker thread panicked"),
            }
        }

        info!(
            committed = summary.committed.len(),
            aborted = summary.aborted.len(),
            "[COORDINATOR] simulation finished"
        );

        summary
    }

    fn build_directory(&self) -> HashMap<TransactionId, TransactionInfo> {
        let mut rng = rand::rng();
        (1..=self.config.transaction_count as TransactionId)
            .map(|tid| {
                let ts = rng.random_range(self.config.timestamp_range.clone());
                (tid, TransactionInfo::new(tid, ts))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Fast-running variant of the default config so the test suite
    // doesn't pay the spec's default [100, 1000]ms think-time and
    // 200ms poll interval on every worker.
    fn fast_config() -> CoordinatorConfig {
        CoordinatorConfig {
            delay_range_ms: 1..5,
            poll_interval: Duration::from_millis(5),
            ..CoordinatorConfig::default()
        }
    }

    #[test]
    fn test_every_transaction_terminates() {
        let config = CoordinatorConfig {
            transaction_count: 6,
            ..fast_config()
        };
        let summary = Coordinator::new(config).run();
        assert_eq!(summary.committed.len() + summary.aborted.len(), 6);
    }

    #[test]
    fn test_default_config_runs_to_completion() {
        let summary = Coordinator::new(fast_config()).run();
        assert_eq!(summary.committed.len() + summary.aborted.len(), 10);
    }

    #[test]
    fn test_default_config_matches_spec_defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.delay_range_ms, 100..1000);
        assert_eq!(config.poll_interval, Duration::from_millis(200));
    }
}
