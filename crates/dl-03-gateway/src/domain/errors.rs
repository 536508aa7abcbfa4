//! # Gateway Errors

use std::fmt;
use std::time::Duration;

use shared_types::FailureStatus;
use thiserror::Error;

/// Why a submit or evaluate failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The peer could not be reached or the channel broke mid-call.
    Unreachable(String),
    /// Local waiting expired. The peer may still commit a submitted proposal.
    Timeout(Duration),
    /// The contract rejected the transaction. Message is the contract's, verbatim.
    Contract(String),
    /// A key read by the transaction changed before commit. Resubmit.
    Conflict(String),
    /// Bad signature, unknown identity, or unknown channel/contract.
    Rejected(String),
    /// The peer or its commit service failed.
    Endorsement(String),
    /// The response could not be decoded or does not match the request.
    Protocol(String),
}

impl FailureReason {
    /// Classify a peer failure response.
    pub fn from_status(status: FailureStatus, message: String) -> Self {
        match status {
            FailureStatus::ContractFailure => Self::Contract(message),
            FailureStatus::CommitConflict => Self::Conflict(message),
            FailureStatus::BadRequest
            | FailureStatus::Unauthorized
            | FailureStatus::UnknownTarget
            | FailureStatus::DuplicateTransaction => Self::Rejected(message),
            FailureStatus::Internal => Self::Endorsement(message),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(m) => write!(f, "peer unreachable: {m}"),
            Self::Timeout(d) => write!(f, "timed out after {}ms", d.as_millis()),
            Self::Contract(m) => write!(f, "{m}"),
            Self::Conflict(m) => write!(f, "commit conflict: {m}"),
            Self::Rejected(m) => write!(f, "rejected by peer: {m}"),
            Self::Endorsement(m) => write!(f, "endorsement failed: {m}"),
            Self::Protocol(m) => write!(f, "protocol error: {m}"),
        }
    }
}

/// Errors raised by a gateway session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The session could not be opened.
    #[error("Failed to open session: {0}")]
    Session(String),

    #[error("Submit of {transaction} failed: {reason}")]
    Submit {
        transaction: String,
        reason: FailureReason,
    },

    #[error("Evaluate of {transaction} failed: {reason}")]
    Evaluate {
        transaction: String,
        reason: FailureReason,
    },

    /// The session was closed; open a new one.
    #[error("Session is closed")]
    SessionClosed,
}

impl GatewayError {
    /// Whether resubmitting the same transaction (with a new proposal) may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.reason(), Some(FailureReason::Conflict(_)))
    }

    /// The failure reason of a submit or evaluate error.
    pub fn reason(&self) -> Option<&FailureReason> {
        match self {
            Self::Submit { reason, .. } | Self::Evaluate { reason, .. } => Some(reason),
            Self::Session(_) | Self::SessionClosed => None,
        }
    }
}
