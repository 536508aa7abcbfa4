//! # Credential Loader
//!
//! Turns PEM certificate and private-key blobs into an [`Identity`] and a
//! [`Signer`]. The membership tag is configuration supplied at construction.

use std::path::Path;

use tracing::{debug, info};
use x509_parser::der_parser;
use zeroize::Zeroizing;

use crate::adapters::FileSystemSource;
use crate::domain::certificate::Certificate;
use crate::domain::errors::CredentialError;
use crate::domain::identity::Identity;
use crate::domain::signer::Signer;
use crate::ports::outbound::CredentialSource;

const TAG_CERTIFICATE: &str = "CERTIFICATE";
const TAG_PKCS8: &str = "PRIVATE KEY";
const TAG_PKCS8_ENCRYPTED: &str = "ENCRYPTED PRIVATE KEY";
const TAG_SEC1: &str = "EC PRIVATE KEY";
const TAG_PKCS1: &str = "RSA PRIVATE KEY";

/// Loads credentials for one membership tag.
#[derive(Debug, Clone)]
pub struct CredentialLoader {
    msp_id: String,
}

impl CredentialLoader {
    /// Create a loader that tags every identity with `msp_id`.
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
        }
    }

    /// The membership tag applied to loaded identities.
    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// Parse the first `CERTIFICATE` block of `cert_pem` into an identity.
    pub fn load_identity(&self, cert_pem: &[u8]) -> Result<Identity, CredentialError> {
        let der = first_block(cert_pem, &[TAG_CERTIFICATE])?.into_contents();
        let certificate = Certificate::from_der(&der)?;
        debug!(
            msp_id = %self.msp_id,
            subject = %certificate.subject(),
            "Loaded certificate"
        );
        Ok(Identity::new(self.msp_id.clone(), certificate))
    }

    /// Parse the first private-key block of `key_pem` into a signer.
    ///
    /// Only PKCS#8 keys can back a signer. SEC1 and PKCS#1 blocks are
    /// recognised and rejected with [`CredentialError::SignerConstruction`].
    pub fn load_signer(&self, key_pem: &[u8]) -> Result<Signer, CredentialError> {
        let block = first_block(
            key_pem,
            &[TAG_PKCS8, TAG_SEC1, TAG_PKCS1, TAG_PKCS8_ENCRYPTED],
        )?;
        let tag = block.tag().to_string();
        let der = Zeroizing::new(block.into_contents());
        check_well_formed_der(&der)?;

        match tag.as_str() {
            TAG_PKCS8 => Signer::from_pkcs8(der),
            TAG_SEC1 => Err(CredentialError::SignerConstruction(
                "SEC1 EC keys are not supported, convert to PKCS#8".into(),
            )),
            TAG_PKCS1 => Err(CredentialError::SignerConstruction(
                "PKCS#1 RSA keys are not supported".into(),
            )),
            _ => Err(CredentialError::SignerConstruction(
                "encrypted private keys are not supported".into(),
            )),
        }
    }

    /// Load an identity and signer and check that they belong together.
    pub fn load(
        &self,
        cert_pem: &[u8],
        key_pem: &[u8],
    ) -> Result<(Identity, Signer), CredentialError> {
        let identity = self.load_identity(cert_pem)?;
        let signer = self.load_signer(key_pem)?;

        if !identity.is_paired_with(&signer) {
            return Err(CredentialError::KeyMismatch {
                subject: identity.certificate().subject().to_string(),
            });
        }

        info!(
            msp_id = %self.msp_id,
            subject = %identity.certificate().subject(),
            algorithm = %signer.algorithm(),
            "Credentials loaded"
        );
        Ok((identity, signer))
    }

    /// Read both blobs from `source` and [`load`](Self::load) them.
    pub fn load_from(
        &self,
        source: &dyn CredentialSource,
        cert_location: &str,
        key_location: &str,
    ) -> Result<(Identity, Signer), CredentialError> {
        let cert_pem = source.read(cert_location)?;
        let key_pem = Zeroizing::new(source.read(key_location)?);
        self.load(&cert_pem, &key_pem)
    }

    /// Read both blobs from disk and [`load`](Self::load) them.
    pub fn load_files(
        &self,
        cert_path: impl AsRef<Path>,
        key_path: impl AsRef<Path>,
    ) -> Result<(Identity, Signer), CredentialError> {
        self.load_from(
            &FileSystemSource,
            &cert_path.as_ref().to_string_lossy(),
            &key_path.as_ref().to_string_lossy(),
        )
    }
}

/// Return every `CERTIFICATE` block of `input` as DER, in order.
pub fn certificates_from_pem(input: &[u8]) -> Result<Vec<Vec<u8>>, CredentialError> {
    let blocks = pem::parse_many(input).map_err(|e| CredentialError::Decode(e.to_string()))?;
    let certs: Vec<Vec<u8>> = blocks
        .into_iter()
        .filter(|block| block.tag() == TAG_CERTIFICATE)
        .map(|block| block.into_contents())
        .collect();
    if certs.is_empty() {
        return Err(CredentialError::Decode("no CERTIFICATE block found".into()));
    }
    Ok(certs)
}

fn first_block(input: &[u8], tags: &[&str]) -> Result<pem::Pem, CredentialError> {
    let blocks = pem::parse_many(input).map_err(|e| CredentialError::Decode(e.to_string()))?;
    blocks
        .into_iter()
        .find(|block| tags.iter().any(|tag| *tag == block.tag()))
        .ok_or_else(|| CredentialError::Decode(format!("no {} block found", tags.join(" / "))))
}

fn check_well_formed_der(der: &[u8]) -> Result<(), CredentialError> {
    let (rest, _) =
        der_parser::parse_der(der).map_err(|e| CredentialError::KeyParse(e.to_string()))?;
    if !rest.is_empty() {
        return Err(CredentialError::KeyParse(format!(
            "{} trailing bytes after key",
            rest.len()
        )));
    }
    Ok(())
}
