//! # Ports Layer
//!
//! - **Inbound (Driving)**: how a peer invokes the contract
//! - **Outbound (Driven)**: the ledger stub the contract reads and writes through

pub mod inbound;
pub mod outbound;
