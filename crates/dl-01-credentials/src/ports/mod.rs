//! # Ports Layer
//!
//! - **Outbound (Driven)**: where credential blobs come from

pub mod outbound;
