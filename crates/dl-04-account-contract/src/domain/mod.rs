//! # Domain Layer
//!
//! Account record, history entry, function table and error types.

pub mod entities;
pub mod errors;
pub mod functions;
pub mod seed;
