//! # Handlers
//!
//! Proposal admission and request processing.

pub mod admission;
pub mod proposals;

pub use admission::{ProposalValidator, Rejection};
pub use proposals::ProposalHandler;
