//! # Account Contract (DL-04)
//!
//! Deterministic contract enforcing the rules for dealer account records and
//! exposing their append-only change history.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): records, history entries, function table
//! - **Ports Layer** (`ports/`): [`LedgerStub`] (driven), [`ContractInvoker`] (driving)
//! - **Adapters Layer** (`adapters/`): in-memory stub
//! - **Service Layer** (`service.rs`): [`AccountContract`]
//!
//! ## Determinism
//!
//! No wall-clock reads, randomness or I/O beyond the stub. The transaction
//! timestamp comes from the signed proposal.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::MemoryStub;
pub use domain::entities::{parse_decimal, AccountRecord, HistoryEntry, NewAccount};
pub use domain::errors::{ContractError, StubError};
pub use domain::functions::Function;
pub use domain::seed::seed_accounts;
pub use ports::inbound::ContractInvoker;
pub use ports::outbound::{KeyModification, LedgerStub};
pub use service::{AccountContract, DEFAULT_CONTRACT_NAME};
