//! # Ports Layer
//!
//! - **Outbound (Driven)**: [`PeerTransport`](outbound::PeerTransport), the request/response link to a peer

pub mod outbound;
