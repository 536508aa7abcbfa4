//! # MVCC Validation
//!
//! A transaction may commit only if every key it read is still at the version
//! it observed. Reads of absent keys must still be absent.

use super::entities::{ReadWriteSet, Version};
use super::errors::{CommitError, WorldStateError};

/// Check `rw_set` against current versions supplied by `current_version`.
///
/// Keys are checked in order, so the reported conflict is deterministic.
pub fn validate_reads<F>(
    tx_id: &str,
    rw_set: &ReadWriteSet,
    mut current_version: F,
) -> Result<(), CommitError>
where
    F: FnMut(&str) -> Result<Option<Version>, WorldStateError>,
{
    for (key, read) in &rw_set.reads {
        let current = current_version(key).map_err(|source| CommitError::Store {
            tx_id: tx_id.to_string(),
            source,
        })?;
        if current != *read {
            return Err(CommitError::Conflict {
                tx_id: tx_id.to_string(),
                key: key.clone(),
                read: read.map(|v| v.0),
                current: current.map(|v| v.0),
            });
        }
    }
    Ok(())
}
