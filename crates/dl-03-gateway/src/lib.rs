//! # Gateway (DL-03)
//!
//! Client-side session to a ledger peer. A [`Session`] binds the caller's
//! identity and signer to a verified secure channel and exposes `submit`
//! (ordered, committed) and `evaluate` (read-only) for named transactions.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): error taxonomy, options, proposal signing
//! - **Ports Layer** (`ports/`): [`PeerTransport`] (driven)
//! - **Adapters Layer** (`adapters/`): [`PeerTransport`] for `SecureChannel`
//! - **Service Layer** (`service.rs`): [`Session`]; `accounts.rs`: [`AccountClient`]
//!
//! ## Usage
//!
//! ```ignore
//! let (identity, signer) = CredentialLoader::new("Org1MSP").load_files(cert, key)?;
//! let channel = SecureChannel::connect(&trust, "localhost:7051", &ChannelConfig::default()).await?;
//! let session = Session::open(identity, signer, channel, "mychannel", "accountcc")?;
//! let record = AccountClient::new(&session).query_account("A001").await?;
//! ```

pub mod accounts;
pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
mod testing;

// Re-export public API
pub use accounts::AccountClient;
pub use domain::errors::{FailureReason, GatewayError};
pub use domain::options::SessionOptions;
pub use ports::outbound::PeerTransport;
pub use service::Session;
