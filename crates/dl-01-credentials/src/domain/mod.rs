//! # Domain Layer
//!
//! Certificate parsing, key handling and signature checks. No I/O.

pub mod algorithm;
pub mod certificate;
pub mod errors;
pub mod identity;
pub mod signer;
