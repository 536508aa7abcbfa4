//! # Identity
//!
//! A membership tag plus the certificate that proves who the caller is. The
//! tag is opaque configuration; nothing here checks it against the
//! certificate contents.

use ring::signature::UnparsedPublicKey;

use super::certificate::Certificate;
use super::errors::CredentialError;
use super::signer::Signer;

/// Who is acting: membership tag and certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    msp_id: String,
    certificate: Certificate,
}

impl Identity {
    /// Bind a membership tag to a parsed certificate.
    pub fn new(msp_id: impl Into<String>, certificate: Certificate) -> Self {
        Self {
            msp_id: msp_id.into(),
            certificate,
        }
    }

    /// Membership tag (e.g. `Org1MSP`).
    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// The identity's certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Verify `signature` over `message` with the certificate public key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CredentialError> {
        let algorithm = self.certificate.key_algorithm().ok_or_else(|| {
            CredentialError::Verification(format!(
                "certificate '{}' uses an unsupported key algorithm",
                self.certificate.subject()
            ))
        })?;

        UnparsedPublicKey::new(algorithm.verification(), self.certificate.public_key())
            .verify(message, signature)
            .map_err(|_| {
                CredentialError::Verification(format!(
                    "{algorithm} signature does not match certificate '{}'",
                    self.certificate.subject()
                ))
            })
    }

    /// Whether `signer` holds the private half of this certificate's key.
    pub fn is_paired_with(&self, signer: &Signer) -> bool {
        self.certificate.key_algorithm() == Some(signer.algorithm())
            && self.certificate.public_key() == signer.public_key()
    }
}
