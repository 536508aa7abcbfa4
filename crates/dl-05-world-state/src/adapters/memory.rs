//! In-memory world state store.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;

use crate::domain::entities::{HistoryRecord, Version, VersionedValue, WriteBatch};
use crate::domain::errors::WorldStateError;
use crate::ports::outbound::WorldStateStore;

#[derive(Debug, Default)]
struct Inner {
    state: HashMap<String, VersionedValue>,
    history: HashMap<String, Vec<HistoryRecord>>,
    committed: HashSet<String>,
    latest: Version,
}

/// [`WorldStateStore`] over in-process maps.
#[derive(Debug, Default)]
pub struct InMemoryWorldState {
    inner: RwLock<Inner>,
}

impl InMemoryWorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.inner.read().state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().state.is_empty()
    }
}

impl WorldStateStore for InMemoryWorldState {
    fn get(&self, key: &str) -> Result<Option<VersionedValue>, WorldStateError> {
        Ok(self.inner.read().state.get(key).cloned())
    }

    fn history(&self, key: &str) -> Result<Vec<HistoryRecord>, WorldStateError> {
        Ok(self.inner.read().history.get(key).cloned().unwrap_or_default())
    }

    fn contains_transaction(&self, tx_id: &str) -> Result<bool, WorldStateError> {
        Ok(self.inner.read().committed.contains(tx_id))
    }

    fn latest_version(&self) -> Result<Version, WorldStateError> {
        Ok(self.inner.read().latest)
    }

    fn apply(&self, batch: WriteBatch) -> Result<(), WorldStateError> {
        let mut inner = self.inner.write();
        if batch.version <= inner.latest {
            return Err(WorldStateError::Storage(format!(
                "batch version {} is not after latest {}",
                batch.version.0, inner.latest.0
            )));
        }

        for (key, write) in batch.writes {
            let record = HistoryRecord {
                tx_id: batch.tx_id.clone(),
                timestamp: batch.timestamp,
                is_delete: write.is_none(),
                value: write.clone().unwrap_or_default(),
            };
            match write {
                Some(value) => {
                    inner.state.insert(
                        key.clone(),
                        VersionedValue {
                            value,
                            version: batch.version,
                        },
                    );
                }
                None => {
                    inner.state.remove(&key);
                }
            }
            inner.history.entry(key).or_default().push(record);
        }

        inner.committed.insert(batch.tx_id);
        inner.latest = batch.version;
        Ok(())
    }
}
