//! # Adapters Layer

pub mod channel;
