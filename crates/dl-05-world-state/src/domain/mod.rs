//! # Domain Layer
//!
//! Versions, read/write sets and the MVCC validation rule.

pub mod entities;
pub mod errors;
pub mod mvcc;
