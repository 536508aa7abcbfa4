//! # Ports Layer
//!
//! - **Inbound (Driving)**: [`CommitService`](inbound::CommitService), the ordering/commit boundary
//! - **Outbound (Driven)**: [`WorldStateStore`](outbound::WorldStateStore), the keyed store

pub mod inbound;
pub mod outbound;
