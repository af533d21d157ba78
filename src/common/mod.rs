// Shared types used across the transaction subsystem.

/// Unique identifier for transactions.
///
/// Opaque from the caller's perspective; the coordinator assigns these
/// sequentially and formats them as `T{n}` in log output.
pub type TransactionId = u64;
