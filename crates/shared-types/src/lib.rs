//! # Shared Types Crate
//!
//! Wire-level types exchanged between the client gateway and a ledger peer.
//!
//! ## Design Principles
//!
//! - **Signed Bytes Are Authoritative**: a `SignedProposal` carries the exact
//!   encoded proposal bytes the creator signed. Peers decode those bytes, they
//!   never re-encode a proposal before verifying it.
//! - **Creator Identity In The Proposal**: the membership tag and certificate of
//!   the caller travel inside the signed payload, so they cannot be swapped.
//! - **One Request Per Stream**: every `PeerRequest` is answered by exactly one
//!   `PeerResponse` on the same bidirectional stream.

pub mod codec;
pub mod envelope;
pub mod errors;
pub mod proposal;

pub use codec::{decode, encode, MAX_FRAME_SIZE, WIRE_VERSION};
pub use envelope::{FailureStatus, PeerRequest, PeerResponse};
pub use errors::WireError;
pub use proposal::{
    compute_tx_id, Proposal, SerializedIdentity, SignedProposal, TxTimestamp, NONCE_LEN,
};
