//! # Outbound Ports

use crate::domain::entities::{HistoryRecord, Version, VersionedValue, WriteBatch};
use crate::domain::errors::WorldStateError;

/// Flat key -> value store with versions and per-key history.
///
/// Stands in for the on-disk engine beneath world state.
pub trait WorldStateStore: Send + Sync {
    /// Committed value and version of `key`.
    fn get(&self, key: &str) -> Result<Option<VersionedValue>, WorldStateError>;

    /// Committed modifications of `key`, oldest first.
    fn history(&self, key: &str) -> Result<Vec<HistoryRecord>, WorldStateError>;

    /// Whether `tx_id` has been committed.
    fn contains_transaction(&self, tx_id: &str) -> Result<bool, WorldStateError>;

    /// Version of the most recent commit, `Version(0)` when empty.
    fn latest_version(&self) -> Result<Version, WorldStateError>;

    /// Apply `batch` atomically and append one history record per written key.
    fn apply(&self, batch: WriteBatch) -> Result<(), WorldStateError>;
}
