//! # World State Errors

use thiserror::Error;

/// Errors raised by a world state store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorldStateError {
    /// The backing store failed.
    #[error("World state storage error: {0}")]
    Storage(String),
}

/// Errors raised while committing a transaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommitError {
    /// A key in the read set changed version after it was read.
    ///
    /// Retryable: re-simulating against fresh state may succeed.
    #[error("MVCC conflict for transaction {tx_id} on key '{key}': read {read:?}, current {current:?}")]
    Conflict {
        tx_id: String,
        key: String,
        read: Option<u64>,
        current: Option<u64>,
    },

    /// The transaction id has already been committed.
    #[error("Transaction {tx_id} was already committed")]
    DuplicateTransaction { tx_id: String },

    /// The store rejected the write batch.
    #[error("Commit of transaction {tx_id} failed: {source}")]
    Store {
        tx_id: String,
        #[source]
        source: WorldStateError,
    },
}

impl CommitError {
    /// Whether resubmitting a freshly simulated transaction may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
