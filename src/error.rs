use thiserror::Error;

/// Top-level crate error.
///
/// The simulator's failure surface is intentionally small: transaction
/// aborts are a normal outcome handled inside [`crate::transaction`] and
/// never reach this type. `DbError` only covers misconfiguration at
/// startup.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, DbError>;
