//! In-memory credential source.

use std::collections::HashMap;

use crate::domain::errors::CredentialError;
use crate::ports::outbound::CredentialSource;

/// Serves blobs from a map; useful when credentials are injected by an
/// orchestrator rather than mounted as files.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    blobs: HashMap<String, Vec<u8>>,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `blob` under `location`, replacing any previous value.
    pub fn insert(&mut self, location: impl Into<String>, blob: impl Into<Vec<u8>>) {
        self.blobs.insert(location.into(), blob.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, location: impl Into<String>, blob: impl Into<Vec<u8>>) -> Self {
        self.insert(location, blob);
        self
    }
}

impl CredentialSource for InMemorySource {
    fn read(&self, location: &str) -> Result<Vec<u8>, CredentialError> {
        self.blobs
            .get(location)
            .cloned()
            .ok_or_else(|| CredentialError::Io {
                location: location.to_string(),
                reason: "not found".to_string(),
            })
    }
}
