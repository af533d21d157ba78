// rusty-lockmgr
//
// CLI entry point for the Wait-Die lock manager simulator. Parses
// configuration, starts structured logging, and runs the coordinator
// to completion.

use std::time::Duration;

use clap::Parser;
use tracing::info;

use rusty_lockmgr::transaction::{Coordinator, CoordinatorConfig};
use rusty_lockmgr::{DbError, Result};

/// Simulates a population of transactions racing for exclusive locks
/// on two shared resources under the Wait-Die deadlock prevention
/// protocol.
#[derive(Debug, Parser)]
#[command(name = "rusty-lockmgr", version, about)]
struct Cli {
    /// Number of transactions to simulate.
    #[arg(long, default_value_t = 10)]
    transactions: u32,

    /// Identifier of the first shared resource.
    #[arg(long, default_value = "X")]
    item_a: String,

    /// Identifier of the second shared resource.
    #[arg(long, default_value = "Y")]
    item_b: String,

    /// Lower bound (inclusive) of the timestamp draw for each transaction.
    #[arg(long, default_value_t = 1)]
    min_timestamp: u32,

    /// Upper bound (inclusive) of the timestamp draw for each transaction.
    #[arg(long, default_value_t = 1000)]
    max_timestamp: u32,

    /// Lower bound (in milliseconds) of the think-time between schedule steps.
    #[arg(long, default_value_t = 100)]
    min_delay_ms: u64,

    /// Upper bound (in milliseconds) of the think-time between schedule steps.
    #[arg(long, default_value_t = 1000)]
    max_delay_ms: u64,

    /// How often (in milliseconds) a blocked worker re-checks the wait-die
    /// predicate and the wait-for graph while waiting for a lock.
    #[arg(long, default_value_t = 200)]
    poll_interval_ms: u64,
}

impl Cli {
    fn into_config(self) -> Result<CoordinatorConfig> {
        if self.item_a == self.item_b {
            return Err(DbError::Configuration(format!(
                "item-a and item-b must name distinct resources, both were `{}`",
                self.item_a
            )));
        }
        if self.min_timestamp > self.max_timestamp {
            return Err(DbError::Configuration(format!(
                "min-timestamp ({}) must not exceed max-timestamp ({})",
                self.min_timestamp, self.max_timestamp
            )));
        }
        if self.transactions == 0 {
            return Err(DbError::Configuration("transactions must be at least 1".into()));
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(DbError::Configuration(format!(
                "min-delay-ms ({}) must not exceed max-delay-ms ({})",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(DbError::Configuration("poll-interval-ms must be at least 1".into()));
        }

        Ok(CoordinatorConfig {
            transaction_count: self.transactions,
            items: (self.item_a, self.item_b),
            timestamp_range: self.min_timestamp..=self.max_timestamp,
            delay_range_ms: self.min_delay_ms..self.max_delay_ms.max(self.min_delay_ms + 1),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        })
    }
}


fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    let config = Cli::parse().into_config()?;

    info!("[MAIN] rusty-lockmgr starting");
    let summary = Coordinator::new(config).run();
    info!(
        committed = summary.committed.len(),
        aborted = summary.aborted.len(),
        "[MAIN] simulation complete"
    );

    Ok(())
}
