//! # Simulation And Commit
//!
//! [`TxSimulator`] executes against current committed state and records a
//! read/write set. [`OrderedCommitter`] serializes commits, re-checks the
//! read set (MVCC) and applies the writes as one batch.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::TxTimestamp;
use tracing::{debug, info};

use crate::domain::entities::{
    CommitReceipt, HistoryRecord, ReadWriteSet, Transaction, Version, WriteBatch,
};
use crate::domain::errors::{CommitError, WorldStateError};
use crate::domain::mvcc::validate_reads;
use crate::ports::inbound::CommitService;
use crate::ports::outbound::WorldStateStore;

/// Records what one transaction reads and writes.
///
/// Reads always see committed state; staged writes are not visible to later
/// reads in the same simulation.
pub struct TxSimulator {
    store: Arc<dyn WorldStateStore>,
    tx_id: String,
    timestamp: TxTimestamp,
    rw_set: ReadWriteSet,
}

impl TxSimulator {
    pub fn new(
        store: Arc<dyn WorldStateStore>,
        tx_id: impl Into<String>,
        timestamp: TxTimestamp,
    ) -> Self {
        Self {
            store,
            tx_id: tx_id.into(),
            timestamp,
            rw_set: ReadWriteSet::default(),
        }
    }

    /// Read `key`, recording the version observed on first read.
    pub fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, WorldStateError> {
        let current = self.store.get(key)?;
        self.rw_set
            .reads
            .entry(key.to_string())
            .or_insert_with(|| current.as_ref().map(|v| v.version));
        Ok(current.map(|v| v.value))
    }

    /// Stage a write.
    pub fn put_state(&mut self, key: &str, value: Vec<u8>) {
        self.rw_set.writes.insert(key.to_string(), Some(value));
    }

    /// Stage a delete.
    pub fn delete_state(&mut self, key: &str) {
        self.rw_set.writes.insert(key.to_string(), None);
    }

    /// Committed history of `key`. Not part of the read set.
    pub fn get_history(&self, key: &str) -> Result<Vec<HistoryRecord>, WorldStateError> {
        self.store.history(key)
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    pub fn timestamp(&self) -> TxTimestamp {
        self.timestamp
    }

    pub fn rw_set(&self) -> &ReadWriteSet {
        &self.rw_set
    }

    /// Finish simulation.
    pub fn into_transaction(self) -> Transaction {
        Transaction {
            tx_id: self.tx_id,
            timestamp: self.timestamp,
            rw_set: self.rw_set,
        }
    }
}

/// Single-peer commit service: commits one transaction at a time in arrival
/// order.
pub struct OrderedCommitter {
    store: Arc<dyn WorldStateStore>,
    order: Mutex<()>,
}

impl OrderedCommitter {
    pub fn new(store: Arc<dyn WorldStateStore>) -> Self {
        Self {
            store,
            order: Mutex::new(()),
        }
    }

    fn commit_in_order(&self, tx: Transaction) -> Result<CommitReceipt, CommitError> {
        let _turn = self.order.lock();
        let store_error = |source| CommitError::Store {
            tx_id: tx.tx_id.clone(),
            source,
        };

        if self
            .store
            .contains_transaction(&tx.tx_id)
            .map_err(store_error)?
        {
            return Err(CommitError::DuplicateTransaction {
                tx_id: tx.tx_id.clone(),
            });
        }

        validate_reads(&tx.tx_id, &tx.rw_set, |key| {
            Ok(self.store.get(key)?.map(|v| v.version))
        })?;

        let latest = self.store.latest_version().map_err(store_error)?;
        let version = Version(latest.0 + 1);
        let keys_written = tx.rw_set.writes.len();

        self.store
            .apply(WriteBatch {
                tx_id: tx.tx_id.clone(),
                timestamp: tx.timestamp,
                version,
                writes: tx.rw_set.writes,
            })
            .map_err(|source| CommitError::Store {
                tx_id: tx.tx_id.clone(),
                source,
            })?;

        debug!(tx_id = %tx.tx_id, reads = tx.rw_set.reads.len(), "Read set validated");
        info!(tx_id = %tx.tx_id, version = version.0, keys_written, "Transaction committed");
        Ok(CommitReceipt {
            tx_id: tx.tx_id,
            version,
            keys_written,
        })
    }
}

#[async_trait]
impl CommitService for OrderedCommitter {
    async fn commit(&self, tx: Transaction) -> Result<CommitReceipt, CommitError> {
        self.commit_in_order(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryWorldState;

    fn setup() -> (Arc<dyn WorldStateStore>, OrderedCommitter) {
        let store: Arc<dyn WorldStateStore> = Arc::new(InMemoryWorldState::new());
        let committer = OrderedCommitter::new(Arc::clone(&store));
        (store, committer)
    }

    fn ts(seconds: i64) -> TxTimestamp {
        TxTimestamp::new(seconds, 0)
    }

    #[tokio::test]
    async fn test_simulate_and_commit() {
        let (store, committer) = setup();

        let mut sim = TxSimulator::new(Arc::clone(&store), "tx1", ts(1));
        assert_eq!(sim.get_state("A001").unwrap(), None);
        sim.put_state("A001", b"v1".to_vec());
        assert_eq!(sim.rw_set().reads.get("A001"), Some(&None));

        let receipt = committer.commit(sim.into_transaction()).await.unwrap();
        assert_eq!(receipt.version, Version(1));
        assert_eq!(receipt.keys_written, 1);
        assert_eq!(store.get("A001").unwrap().unwrap().value, b"v1".to_vec());
    }

    #[tokio::test]
    async fn test_staged_writes_are_not_read_back() {
        let (store, _) = setup();
        let mut sim = TxSimulator::new(store, "tx1", ts(1));
        sim.put_state("A001", b"v1".to_vec());
        assert_eq!(sim.get_state("A001").unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_writers_conflict() {
        let (store, committer) = setup();
        let mut seed = TxSimulator::new(Arc::clone(&store), "seed", ts(1));
        seed.put_state("A001", b"1000".to_vec());
        committer.commit(seed.into_transaction()).await.unwrap();

        // Both read version 1, both write.
        let mut first = TxSimulator::new(Arc::clone(&store), "tx-a", ts(2));
        let mut second = TxSimulator::new(Arc::clone(&store), "tx-b", ts(2));
        first.get_state("A001").unwrap();
        second.get_state("A001").unwrap();
        first.put_state("A001", b"1500".to_vec());
        second.put_state("A001", b"900".to_vec());

        committer.commit(first.into_transaction()).await.unwrap();
        let err = committer.commit(second.into_transaction()).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(err, CommitError::Conflict { ref key, .. } if key == "A001"));
        assert_eq!(store.get("A001").unwrap().unwrap().value, b"1500".to_vec());
        assert_eq!(store.history("A001").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_transaction_rejected() {
        let (store, committer) = setup();
        let mut sim = TxSimulator::new(Arc::clone(&store), "tx1", ts(1));
        sim.put_state("A001", b"v".to_vec());
        let tx = sim.into_transaction();

        committer.commit(tx.clone()).await.unwrap();
        let err = committer.commit(tx).await.unwrap_err();
        assert_eq!(
            err,
            CommitError::DuplicateTransaction {
                tx_id: "tx1".into()
            }
        );
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_history_carries_tx_timestamp() {
        let (store, committer) = setup();
        let mut sim = TxSimulator::new(Arc::clone(&store), "tx1", ts(1_700_000_123));
        sim.put_state("A001", b"v".to_vec());
        committer.commit(sim.into_transaction()).await.unwrap();

        let sim = TxSimulator::new(Arc::clone(&store), "tx2", ts(0));
        let history = sim.get_history("A001").unwrap();
        assert_eq!(history[0].timestamp, ts(1_700_000_123));
        assert!(sim.rw_set().reads.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_increments_serialize() {
        let (store, committer) = setup();
        let committer = Arc::new(committer);
        let mut seed = TxSimulator::new(Arc::clone(&store), "seed", ts(0));
        seed.put_state("counter", b"0".to_vec());
        committer.commit(seed.into_transaction()).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = Arc::clone(&store);
            let committer = Arc::clone(&committer);
            handles.push(tokio::spawn(async move {
                loop {
                    let tx_id = format!("tx{i}-{}", next_attempt());
                    let mut sim = TxSimulator::new(Arc::clone(&store), tx_id, ts(i));
                    let raw = sim.get_state("counter").unwrap().unwrap();
                    let n: u64 = String::from_utf8(raw).unwrap().parse().unwrap();
                    sim.put_state("counter", (n + 1).to_string().into_bytes());
                    match committer.commit(sim.into_transaction()).await {
                        Ok(_) => break,
                        Err(e) if e.is_retryable() => continue,
                        Err(e) => panic!("unexpected: {e}"),
                    }
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let value = store.get("counter").unwrap().unwrap().value;
        assert_eq!(value, b"8".to_vec());
    }

    fn next_attempt() -> u64 {
        use std::sync::atomic::{AtomicU64, Ordering};
        static NEXT: AtomicU64 = AtomicU64::new(0);
        NEXT.fetch_add(1, Ordering::Relaxed)
    }
}
