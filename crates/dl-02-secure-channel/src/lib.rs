//! # Secure Channel (DL-02)
//!
//! Encrypted, authenticated transport between a gateway session and a ledger
//! peer.
//!
//! ## Security Properties
//!
//! - TLS 1.3 only, over QUIC (RFC 9000 / RFC 9001)
//! - The peer chain is validated against an explicit [`TrustStore`] and the
//!   expected server name before any application data is sent
//! - No 0-RTT: a request is never replayable by an on-path attacker
//!
//! ## Framing
//!
//! One request per bidirectional stream, answered by one response on the same
//! stream. Both directions are bounded by `max_message_size`.

pub mod client;
pub mod config;
pub mod error;
pub mod server;
mod tls;
pub mod trust;

pub use client::SecureChannel;
pub use config::{ChannelConfig, ALPN_PROTOCOL};
pub use error::ChannelError;
pub use server::{IncomingRequest, PeerConnection, PeerListener, PeerResponder, PendingConnection};
pub use trust::TrustStore;
