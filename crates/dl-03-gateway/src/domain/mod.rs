//! # Domain Layer
//!
//! Error taxonomy, per-call options and proposal construction.

pub mod errors;
pub mod options;
pub mod proposal;
