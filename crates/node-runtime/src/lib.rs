//! # Node Runtime Library
//!
//! The ledger peer: hosts the account contract behind a secure listener and
//! commits submitted transactions through the ordered commit service.
//!
//! ## Request Flow
//!
//! ```text
//! SecureChannel ──PeerRequest──→ PeerListener
//!                                    │
//!                         ProposalValidator (channel, contract,
//!                                    │       tx id, membership, signature)
//!                                    ↓
//!                        TxSimulator + AccountContract
//!                                    │
//!                    Evaluate ───────┴─────── Submit
//!                       │                        │
//!                    result              OrderedCommitter (MVCC)
//!                                                │
//!                                          result after commit
//! ```

pub mod adapters;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod runtime;
pub mod server;

pub use config::{ConfigError, NodeConfig};
pub use errors::NodeError;
pub use handlers::{ProposalHandler, ProposalValidator, Rejection};
pub use runtime::NodeRuntime;
