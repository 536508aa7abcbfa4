//! # Peer Request / Response Envelope
//!
//! The session sends exactly one `PeerRequest` per stream and the peer answers
//! with exactly one `PeerResponse`.

use serde::{Deserialize, Serialize};

use crate::proposal::SignedProposal;

/// A request from a gateway session to a ledger peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerRequest {
    /// Execute read-only against the peer's current state; nothing is committed.
    Evaluate(SignedProposal),
    /// Execute, order and commit; the peer replies once the commit outcome is known.
    Submit(SignedProposal),
}

impl PeerRequest {
    /// The signed proposal carried by this request.
    pub fn signed_proposal(&self) -> &SignedProposal {
        match self {
            Self::Evaluate(signed) | Self::Submit(signed) => signed,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Evaluate(_) => "evaluate",
            Self::Submit(_) => "submit",
        }
    }
}

/// Why a peer refused or failed a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureStatus {
    /// The request or proposal could not be decoded or is inconsistent.
    BadRequest,
    /// Signature, certificate or membership check failed.
    Unauthorized,
    /// The proposal targets a channel or contract this peer does not host.
    UnknownTarget,
    /// The contract rejected the transaction (business-rule outcome).
    ContractFailure,
    /// A key read by the transaction changed before commit; resubmit.
    CommitConflict,
    /// The transaction id was already committed.
    DuplicateTransaction,
    /// Any other failure inside the peer or commit service.
    Internal,
}

impl FailureStatus {
    /// Whether resubmitting a freshly built proposal may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CommitConflict)
    }
}

/// A peer's answer to a `PeerRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerResponse {
    /// The request succeeded. For submits the transaction is committed.
    Success {
        /// Transaction id of the proposal.
        tx_id: String,
        /// Contract result bytes.
        payload: Vec<u8>,
    },
    /// The request failed.
    Failure {
        /// Transaction id, empty if the proposal could not be decoded.
        tx_id: String,
        /// Failure classification.
        status: FailureStatus,
        /// Human-readable cause.
        message: String,
    },
}

impl PeerResponse {
    /// Build a failure response.
    pub fn failure(tx_id: impl Into<String>, status: FailureStatus, message: impl Into<String>) -> Self {
        Self::Failure {
            tx_id: tx_id.into(),
            status,
            message: message.into(),
        }
    }
}
