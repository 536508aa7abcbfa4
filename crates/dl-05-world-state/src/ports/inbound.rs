//! # Inbound Ports

use async_trait::async_trait;

use crate::domain::entities::{CommitReceipt, Transaction};
use crate::domain::errors::CommitError;

/// Orders and commits simulated transactions.
///
/// Stands in for the ledger's ordering and block replication. Resolves once
/// the outcome is final.
#[async_trait]
pub trait CommitService: Send + Sync {
    /// Validate and commit `tx`.
    async fn commit(&self, tx: Transaction) -> Result<CommitReceipt, CommitError>;
}
