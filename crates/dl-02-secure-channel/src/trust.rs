//! Trust roots used to validate a peer's certificate chain.

use std::sync::Arc;

use dl_01_credentials::certificates_from_pem;
use rustls::pki_types::CertificateDer;
use rustls::RootCertStore;
use tracing::debug;

use crate::error::ChannelError;

/// A set of trusted root certificates.
#[derive(Debug, Clone)]
pub struct TrustStore {
    roots: Arc<RootCertStore>,
}

impl TrustStore {
    /// Build a store from every `CERTIFICATE` block in `root_pem`.
    ///
    /// Fails if no certificate is found or any block is rejected as a root.
    pub fn from_pem(root_pem: &[u8]) -> Result<Self, ChannelError> {
        let certs = certificates_from_pem(root_pem).map_err(|e| ChannelError::TrustStore {
            reason: e.to_string(),
        })?;

        let mut roots = RootCertStore::empty();
        for der in certs {
            roots
                .add(CertificateDer::from(der))
                .map_err(|e| ChannelError::TrustStore {
                    reason: format!("root certificate rejected: {e}"),
                })?;
        }

        debug!(roots = roots.len(), "Trust store loaded");
        Ok(Self {
            roots: Arc::new(roots),
        })
    }

    /// Number of trusted roots.
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Whether the store holds no roots. Always false for a store built by
    /// [`from_pem`](Self::from_pem).
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub(crate) fn roots(&self) -> Arc<RootCertStore> {
        Arc::clone(&self.roots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_01_credentials::testing::TestPki;

    #[test]
    fn test_loads_every_root() {
        let a = TestPki::new();
        let b = TestPki::new();
        let bundle = format!("{}{}", a.ca_pem(), b.ca_pem());

        let store = TrustStore::from_pem(bundle.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(!store.is_empty());
    }

    #[test]
    fn test_rejects_input_without_certificates() {
        let err = TrustStore::from_pem(b"nothing to see here").unwrap_err();
        assert!(matches!(err, ChannelError::TrustStore { .. }));
    }

    #[test]
    fn test_rejects_unparsable_certificate() {
        let blob = "-----BEGIN CERTIFICATE-----\nAAECAw==\n-----END CERTIFICATE-----\n";
        let err = TrustStore::from_pem(blob.as_bytes()).unwrap_err();
        assert!(matches!(err, ChannelError::TrustStore { .. }));
    }
}
