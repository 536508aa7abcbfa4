//! # World State Entities

use std::collections::BTreeMap;

use shared_types::TxTimestamp;

/// Commit sequence number that last wrote a key. Strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(pub u64);

/// A committed value with the version that wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: Version,
}

/// One committed modification of a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub tx_id: String,
    pub timestamp: TxTimestamp,
    pub is_delete: bool,
    pub value: Vec<u8>,
}

/// Keys a simulation read (with the version observed) and the writes it staged.
///
/// Ordered maps keep the set deterministic across peers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadWriteSet {
    /// `None` means the key was absent when read.
    pub reads: BTreeMap<String, Option<Version>>,
    /// `None` means delete.
    pub writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl ReadWriteSet {
    /// Whether the simulation staged no writes.
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// A simulated transaction ready for commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub tx_id: String,
    pub timestamp: TxTimestamp,
    pub rw_set: ReadWriteSet,
}

/// Write batch applied atomically by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteBatch {
    pub tx_id: String,
    pub timestamp: TxTimestamp,
    pub version: Version,
    pub writes: BTreeMap<String, Option<Vec<u8>>>,
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    pub tx_id: String,
    pub version: Version,
    pub keys_written: usize,
}
