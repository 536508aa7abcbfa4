//! # Dealer-Ledger Test Suite
//!
//! End-to-end flows that run a real peer on a loopback port and drive it
//! through gateway sessions over the secure channel.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs     # Test PKI, peer startup, session helpers
//!     ├── flows.rs       # Account lifecycle through submit/evaluate
//!     └── admission.rs   # Trust, membership and routing failures
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dl-tests
//! cargo test -p dl-tests integration::flows::
//! ```

pub mod integration;
