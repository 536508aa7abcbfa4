//! # Outbound Ports
//!
//! The contract's only view of the world. Everything it reads or writes goes
//! through a [`LedgerStub`] scoped to one transaction.

use shared_types::TxTimestamp;

use crate::domain::errors::StubError;

/// One committed modification of a key, as reported by the history index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    pub tx_id: String,
    pub timestamp: TxTimestamp,
    pub is_delete: bool,
    /// Value written; empty for deletes.
    pub value: Vec<u8>,
}

/// Transaction-scoped access to world state.
///
/// Writes are not visible to other transactions until the commit service
/// accepts the read/write set. Implementations must be deterministic for a
/// given snapshot: no wall clock, no randomness.
pub trait LedgerStub {
    /// Current value of `key`, `None` if absent.
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StubError>;

    /// Stage a write of `value` under `key`.
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StubError>;

    /// Committed modifications of `key`, oldest first.
    fn get_history_for_key(&mut self, key: &str) -> Result<Vec<KeyModification>, StubError>;

    /// Id of the executing transaction.
    fn tx_id(&self) -> &str;

    /// Timestamp chosen by the transaction creator.
    fn tx_timestamp(&self) -> TxTimestamp;
}
