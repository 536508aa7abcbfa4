//! # Credentials (DL-01)
//!
//! Loads the caller's X.509 certificate and private key from PEM and turns
//! them into an [`Identity`] (who is acting) and a [`Signer`] (what signs).
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): certificate parsing, signer, signature checks
//! - **Ports Layer** (`ports/`): where PEM blobs come from
//! - **Adapters Layer** (`adapters/`): filesystem and in-memory sources
//! - **Service Layer** (`service.rs`): [`CredentialLoader`]
//!
//! ## Supported Keys
//!
//! PKCS#8 encoded ECDSA P-256/SHA-256, ECDSA P-384/SHA-384 and Ed25519.
//! ECDSA signatures are ASN.1 DER encoded.
//!
//! ## Security Notes
//!
//! - The private key never leaves the [`Signer`]; its DER is wiped after use
//! - [`CredentialLoader::load`] refuses a key that does not match the certificate

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export public API
pub use adapters::{FileSystemSource, InMemorySource};
pub use domain::algorithm::KeyAlgorithm;
pub use domain::certificate::Certificate;
pub use domain::errors::CredentialError;
pub use domain::identity::Identity;
pub use domain::signer::Signer;
pub use ports::outbound::CredentialSource;
pub use service::{certificates_from_pem, CredentialLoader};
