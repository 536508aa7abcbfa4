//! # Adapters
//!
//! Bridges between subsystem ports.

pub mod stub;

pub use stub::SimulationStub;
