//! Test PKI fixtures.
//!
//! Generates a throwaway CA and issues leaf credentials from it so tests can
//! exercise certificate parsing, signing and TLS chain validation without
//! checked-in key material. Available with the `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust
//! use dl_01_credentials::testing::TestPki;
//! use dl_01_credentials::{CredentialLoader, KeyAlgorithm};
//!
//! let pki = TestPki::new();
//! let issued = pki.issue("client", KeyAlgorithm::EcdsaP256Sha256);
//! let (identity, signer) = CredentialLoader::new("Org1MSP")
//!     .load(issued.cert_pem.as_bytes(), issued.key_pem.as_bytes())
//!     .unwrap();
//! assert!(identity.is_paired_with(&signer));
//! ```

use rcgen::{
    BasicConstraints, CertificateParams, DnType, ExtendedKeyUsagePurpose, IsCa, KeyPair,
    KeyUsagePurpose, SignatureAlgorithm,
};

use crate::domain::algorithm::KeyAlgorithm;

/// PEM and DER forms of one issued certificate and its PKCS#8 key.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    pub cert_pem: String,
    pub key_pem: String,
    pub cert_der: Vec<u8>,
    pub key_der: Vec<u8>,
}

/// A self-signed CA that issues leaf credentials.
pub struct TestPki {
    ca_cert: rcgen::Certificate,
    ca_key: KeyPair,
}

impl TestPki {
    /// Common name of every generated CA.
    pub const CA_NAME: &'static str = "Dealer Ledger Test CA";

    /// Generate a fresh P-256 CA.
    pub fn new() -> Self {
        let ca_key = KeyPair::generate().expect("generate CA key");
        let mut params = CertificateParams::new(Vec::<String>::new()).expect("CA params");
        params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        params
            .distinguished_name
            .push(DnType::CommonName, Self::CA_NAME);
        params.key_usages = vec![
            KeyUsagePurpose::KeyCertSign,
            KeyUsagePurpose::CrlSign,
            KeyUsagePurpose::DigitalSignature,
        ];
        let ca_cert = params.self_signed(&ca_key).expect("self-sign CA");
        Self { ca_cert, ca_key }
    }

    /// The CA certificate in PEM form, usable as a trust root.
    pub fn ca_pem(&self) -> String {
        self.ca_cert.pem()
    }

    /// The CA certificate in DER form.
    pub fn ca_der(&self) -> Vec<u8> {
        self.ca_cert.der().to_vec()
    }

    /// Issue a leaf for `name`, which becomes both the CN and a DNS SAN.
    pub fn issue(&self, name: &str, algorithm: KeyAlgorithm) -> IssuedCredential {
        let key = generate_key(algorithm);
        let params = leaf_params(name);
        let cert = params
            .signed_by(&key, &self.ca_cert, &self.ca_key)
            .expect("sign leaf");
        IssuedCredential {
            cert_pem: cert.pem(),
            key_pem: key.serialize_pem(),
            cert_der: cert.der().to_vec(),
            key_der: key.serialize_der(),
        }
    }
}

impl Default for TestPki {
    fn default() -> Self {
        Self::new()
    }
}

/// Issue a self-signed leaf that chains to no CA.
pub fn self_signed(name: &str, algorithm: KeyAlgorithm) -> IssuedCredential {
    let key = generate_key(algorithm);
    let cert = leaf_params(name).self_signed(&key).expect("self-sign leaf");
    IssuedCredential {
        cert_pem: cert.pem(),
        key_pem: key.serialize_pem(),
        cert_der: cert.der().to_vec(),
        key_der: key.serialize_der(),
    }
}

fn leaf_params(name: &str) -> CertificateParams {
    let mut params = CertificateParams::new(vec![name.to_string()]).expect("leaf params");
    params.distinguished_name.push(DnType::CommonName, name);
    params.key_usages = vec![KeyUsagePurpose::DigitalSignature];
    params.extended_key_usages = vec![
        ExtendedKeyUsagePurpose::ServerAuth,
        ExtendedKeyUsagePurpose::ClientAuth,
    ];
    params
}

fn generate_key(algorithm: KeyAlgorithm) -> KeyPair {
    let alg: &'static SignatureAlgorithm = match algorithm {
        KeyAlgorithm::EcdsaP256Sha256 => &rcgen::PKCS_ECDSA_P256_SHA256,
        KeyAlgorithm::EcdsaP384Sha384 => &rcgen::PKCS_ECDSA_P384_SHA384,
        KeyAlgorithm::Ed25519 => &rcgen::PKCS_ED25519,
    };
    KeyPair::generate_for(alg).expect("generate leaf key")
}
