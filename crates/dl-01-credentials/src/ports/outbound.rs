//! # Outbound Ports
//!
//! Sources the loader reads raw PEM blobs from.

use crate::domain::errors::CredentialError;

/// A place credential blobs can be read from, addressed by location string.
pub trait CredentialSource: Send + Sync {
    /// Read the full blob stored at `location`.
    ///
    /// Fails with [`CredentialError::Io`] if it cannot be read.
    fn read(&self, location: &str) -> Result<Vec<u8>, CredentialError>;
}
