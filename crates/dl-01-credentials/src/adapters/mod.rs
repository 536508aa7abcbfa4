//! # Adapters Layer
//!
//! Concrete credential sources.

pub mod fs;
pub mod memory;

pub use fs::FileSystemSource;
pub use memory::InMemorySource;
