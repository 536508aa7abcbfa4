//! # World State (DL-05)
//!
//! Versioned key -> value state beneath the account contract, plus the
//! simulate-then-commit pipeline a peer runs for each submitted transaction.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): versions, read/write sets, MVCC rule
//! - **Ports Layer** (`ports/`): [`WorldStateStore`] (driven), [`CommitService`] (driving)
//! - **Adapters Layer** (`adapters/`): in-memory store
//! - **Service Layer** (`service.rs`): [`TxSimulator`], [`OrderedCommitter`]
//!
//! ## Invariants
//!
//! - A transaction commits only if every key it read is unchanged
//! - A transaction id commits at most once
//! - History per key is append-only and ordered by commit

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::InMemoryWorldState;
pub use domain::entities::{
    CommitReceipt, HistoryRecord, ReadWriteSet, Transaction, Version, VersionedValue, WriteBatch,
};
pub use domain::errors::{CommitError, WorldStateError};
pub use domain::mvcc::validate_reads;
pub use ports::inbound::CommitService;
pub use ports::outbound::WorldStateStore;
pub use service::{OrderedCommitter, TxSimulator};
