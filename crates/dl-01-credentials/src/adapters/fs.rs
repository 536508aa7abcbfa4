//! Filesystem-backed credential source.

use tracing::debug;

use crate::domain::errors::CredentialError;
use crate::ports::outbound::CredentialSource;

/// Reads credential blobs from local files; the location is a path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemSource;

impl CredentialSource for FileSystemSource {
    fn read(&self, location: &str) -> Result<Vec<u8>, CredentialError> {
        debug!(path = %location, "Reading credential file");
        std::fs::read(location).map_err(|e| CredentialError::Io {
            location: location.to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"-----BEGIN CERTIFICATE-----").unwrap();

        let path = file.path().to_string_lossy().into_owned();
        assert_eq!(
            FileSystemSource.read(&path).unwrap(),
            b"-----BEGIN CERTIFICATE-----".to_vec()
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FileSystemSource.read("/nonexistent/msp/cert.pem").unwrap_err();
        match err {
            CredentialError::Io { location, .. } => assert_eq!(location, "/nonexistent/msp/cert.pem"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
