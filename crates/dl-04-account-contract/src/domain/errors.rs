//! # Contract Errors
//!
//! Business-rule failures are surfaced to the caller verbatim and are never
//! retried. The messages for missing and duplicate accounts are part of the
//! contract's observable behaviour.

use thiserror::Error;

/// Failure reported by the ledger stub (world state or history access).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct StubError(pub String);

/// Errors returned by contract operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    /// `CreateAccount` on an id that is already present.
    #[error("account {dealer_id} already exists")]
    AlreadyExists { dealer_id: String },

    /// The id is not present in world state.
    #[error("account {dealer_id} does not exist")]
    NotFound { dealer_id: String },

    /// A numeric argument is not a plain decimal number.
    #[error("invalid {field} '{value}': expected a decimal number")]
    NumericParse { field: &'static str, value: String },

    /// Wrong number of arguments for a function.
    #[error("{function} expects {expected} arguments, received {received}")]
    InvalidArguments {
        function: String,
        expected: usize,
        received: usize,
    },

    /// No function with that name.
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// A stored record or a result could not be (de)serialized.
    #[error("failed to {operation} account {dealer_id}: {reason}")]
    Serialization {
        operation: &'static str,
        dealer_id: String,
        reason: String,
    },

    /// The ledger stub failed.
    #[error("failed to {operation} for {key}: {source}")]
    Ledger {
        operation: &'static str,
        key: String,
        #[source]
        source: StubError,
    },
}

impl ContractError {
    pub(crate) fn ledger(operation: &'static str, key: &str, source: StubError) -> Self {
        Self::Ledger {
            operation,
            key: key.to_string(),
            source,
        }
    }
}
