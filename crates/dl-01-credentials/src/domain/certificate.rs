//! # Certificate
//!
//! Owned view of a parsed X.509 certificate. Only the fields the ledger needs
//! are extracted; the original DER is kept so it can be shipped as the
//! creator of a proposal.

use super::algorithm::KeyAlgorithm;
use super::errors::CredentialError;

/// A parsed X.509 certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    subject: String,
    issuer: String,
    serial: String,
    not_before: i64,
    not_after: i64,
    key_algorithm: Option<KeyAlgorithm>,
    public_key: Vec<u8>,
    der: Vec<u8>,
}

impl Certificate {
    /// Parse a DER-encoded certificate.
    ///
    /// Trailing bytes after the certificate are rejected.
    pub fn from_der(der: &[u8]) -> Result<Self, CredentialError> {
        let (rest, cert) = x509_parser::parse_x509_certificate(der)
            .map_err(|e| CredentialError::CertificateParse(e.to_string()))?;
        if !rest.is_empty() {
            return Err(CredentialError::CertificateParse(format!(
                "{} trailing bytes after certificate",
                rest.len()
            )));
        }

        let spki = cert.public_key();
        let oid = spki.algorithm.algorithm.to_id_string();
        let public_key = spki.subject_public_key.data.to_vec();
        let key_algorithm = KeyAlgorithm::from_spki(&oid, &public_key);
        let validity = cert.validity();

        Ok(Self {
            subject: cert.subject().to_string(),
            issuer: cert.issuer().to_string(),
            serial: cert.raw_serial_as_string(),
            not_before: validity.not_before.timestamp(),
            not_after: validity.not_after.timestamp(),
            key_algorithm,
            public_key,
            der: der.to_vec(),
        })
    }

    /// Subject distinguished name, RFC 4514 style.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Issuer distinguished name.
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Serial number as colon-separated hex.
    pub fn serial(&self) -> &str {
        &self.serial
    }

    /// Start of the validity window (unix seconds).
    pub fn not_before(&self) -> i64 {
        self.not_before
    }

    /// End of the validity window (unix seconds).
    pub fn not_after(&self) -> i64 {
        self.not_after
    }

    /// Whether `unix_seconds` falls inside the validity window.
    pub fn is_valid_at(&self, unix_seconds: i64) -> bool {
        self.not_before <= unix_seconds && unix_seconds <= self.not_after
    }

    /// Signature scheme of the subject key, `None` if unsupported.
    pub fn key_algorithm(&self) -> Option<KeyAlgorithm> {
        self.key_algorithm
    }

    /// Raw subject public key bytes.
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// The DER encoding this certificate was parsed from.
    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Check that `issuer`'s key signed this certificate.
    ///
    /// Only the signature is checked; names and validity are the caller's
    /// concern.
    pub fn verify_issued_by(&self, issuer: &Certificate) -> Result<(), CredentialError> {
        let (_, cert) = x509_parser::parse_x509_certificate(&self.der)
            .map_err(|e| CredentialError::CertificateParse(e.to_string()))?;
        let (_, issuer_cert) = x509_parser::parse_x509_certificate(&issuer.der)
            .map_err(|e| CredentialError::CertificateParse(e.to_string()))?;

        cert.verify_signature(Some(issuer_cert.public_key()))
            .map_err(|e| {
                CredentialError::Verification(format!(
                    "'{}' is not signed by '{}': {e}",
                    self.subject, issuer.subject
                ))
            })
    }
}
