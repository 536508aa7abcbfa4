//! # Credential Errors
//!
//! Credential and format errors are fatal at process start: a caller that
//! cannot load its identity has nothing to retry.

use thiserror::Error;

/// Errors raised while loading, pairing or using credentials.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// The input holds no usable PEM block of the expected kind.
    #[error("PEM decoding failed: {0}")]
    Decode(String),

    /// The certificate bytes are not a valid X.509 certificate.
    #[error("Certificate parse failed: {0}")]
    CertificateParse(String),

    /// The private key bytes are not well-formed DER.
    #[error("Private key parse failed: {0}")]
    KeyParse(String),

    /// The key parsed but cannot back a signer (wrong encoding or algorithm).
    #[error("Signer construction failed: {0}")]
    SignerConstruction(String),

    /// The private key does not belong to the certificate's public key.
    #[error("Private key does not match certificate '{subject}'")]
    KeyMismatch { subject: String },

    /// A credential blob could not be read.
    #[error("Failed to read credential '{location}': {reason}")]
    Io { location: String, reason: String },

    /// The signature does not verify under the certificate public key.
    #[error("Signature verification failed: {0}")]
    Verification(String),

    /// The underlying signing primitive failed.
    #[error("Signing failed: {0}")]
    Signing(String),
}
