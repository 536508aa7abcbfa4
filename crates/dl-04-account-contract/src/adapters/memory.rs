//! In-memory ledger stub.
//!
//! Keeps committed state and per-key history in maps. Writes are staged per
//! transaction and applied on [`MemoryStub::commit`], one history entry per
//! written key, so a single-process host or a test sees the same history
//! shape a committing peer produces.

use std::collections::{BTreeMap, HashMap};

use shared_types::TxTimestamp;

use crate::domain::errors::StubError;
use crate::ports::outbound::{KeyModification, LedgerStub};

/// A [`LedgerStub`] over in-process maps.
#[derive(Debug, Default)]
pub struct MemoryStub {
    state: HashMap<String, Vec<u8>>,
    history: HashMap<String, Vec<KeyModification>>,
    pending: BTreeMap<String, Vec<u8>>,
    tx_id: String,
    timestamp: TxTimestamp,
}

impl MemoryStub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transaction, discarding any uncommitted writes.
    pub fn begin(&mut self, tx_id: impl Into<String>, timestamp: TxTimestamp) {
        self.pending.clear();
        self.tx_id = tx_id.into();
        self.timestamp = timestamp;
    }

    /// Apply staged writes. Returns the number of keys written.
    pub fn commit(&mut self) -> usize {
        let writes = std::mem::take(&mut self.pending);
        let count = writes.len();
        for (key, value) in writes {
            self.history
                .entry(key.clone())
                .or_default()
                .push(KeyModification {
                    tx_id: self.tx_id.clone(),
                    timestamp: self.timestamp,
                    is_delete: false,
                    value: value.clone(),
                });
            self.state.insert(key, value);
        }
        count
    }

    /// Drop staged writes.
    pub fn rollback(&mut self) {
        self.pending.clear();
    }

    /// Committed value of `key`.
    pub fn committed(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    /// Number of committed keys.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Append a raw history record without touching state.
    pub fn push_history(&mut self, key: impl Into<String>, modification: KeyModification) {
        self.history.entry(key.into()).or_default().push(modification);
    }
}

impl LedgerStub for MemoryStub {
    fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, StubError> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StubError> {
        if key.is_empty() {
            return Err(StubError("empty key".into()));
        }
        self.pending.insert(key.to_string(), value);
        Ok(())
    }

    fn get_history_for_key(&mut self, key: &str) -> Result<Vec<KeyModification>, StubError> {
        Ok(self.history.get(key).cloned().unwrap_or_default())
    }

    fn tx_id(&self) -> &str {
        &self.tx_id
    }

    fn tx_timestamp(&self) -> TxTimestamp {
        self.timestamp
    }
}
