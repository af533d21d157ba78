// rusty-lockmgr - Wait-Die concurrency control simulator
//
// A classical database lock manager: transactions race to acquire
// exclusive locks on a small set of shared resources, deadlocks are
// detected in a global wait-for graph, and the Wait-Die timestamp
// ordering protocol (Rosenkrantz, Stearns & Lewis) decides who waits
// and who dies.

pub mod common;
pub mod error;
pub mod transaction;

pub use error::{DbError, Result};
