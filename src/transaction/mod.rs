// Wait-Die transaction concurrency control.
//
// | Module | Responsibility |
// |--------|----------------|
// | [`types`] | `TransactionInfo`, `TransactionState` |
// | [`error`] | `TransactionError`, the abort signal |
// | [`resource`] | Per-item holder + FIFO wait queue |
// | [`wfg`] | The global wait-for graph and cycle detection |
// | [`lock_manager`] | Wait-Die arbitration over the resource table |
// | [`worker`] | Per-transaction access schedule |
// | [`coordinator`] | Builds the population and runs a simulation |

pub mod coordinator;
pub mod error;
pub mod lock_manager;
pub mod resource;
pub mod types;
pub mod wfg;
pub mod worker;

pub use coordinator::{Coordinator, CoordinatorConfig, RunSummary};
pub use error::{TransactionError, TransactionResult};
pub use lock_manager::LockManager;
pub use types::{TransactionInfo, TransactionState};
