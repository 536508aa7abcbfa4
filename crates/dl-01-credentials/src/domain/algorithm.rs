//! # Key Algorithms
//!
//! Signature schemes a credential may use. ECDSA signatures are ASN.1 DER
//! encoded, which is the form peers and X.509 tooling expect.

use ring::signature::{
    self, EcdsaSigningAlgorithm, VerificationAlgorithm, ECDSA_P256_SHA256_ASN1,
    ECDSA_P256_SHA256_ASN1_SIGNING, ECDSA_P384_SHA384_ASN1, ECDSA_P384_SHA384_ASN1_SIGNING,
};

/// OID of `id-ecPublicKey` in a SubjectPublicKeyInfo.
pub(crate) const OID_EC_PUBLIC_KEY: &str = "1.2.840.10045.2.1";

/// OID of `id-Ed25519`.
pub(crate) const OID_ED25519: &str = "1.3.101.112";

/// Uncompressed SEC1 point length on P-256 (`0x04 || X || Y`).
const P256_POINT_LEN: usize = 65;

/// Uncompressed SEC1 point length on P-384.
const P384_POINT_LEN: usize = 97;

/// Ed25519 public key length.
const ED25519_KEY_LEN: usize = 32;

/// A supported signature scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlgorithm {
    /// ECDSA over NIST P-256 with SHA-256.
    EcdsaP256Sha256,
    /// ECDSA over NIST P-384 with SHA-384.
    EcdsaP384Sha384,
    /// Pure Ed25519.
    Ed25519,
}

impl KeyAlgorithm {
    /// Classify a SubjectPublicKeyInfo by its algorithm OID and key length.
    ///
    /// EC curves are told apart by point length, so compressed points are
    /// reported as unsupported.
    pub fn from_spki(algorithm_oid: &str, public_key: &[u8]) -> Option<Self> {
        match (algorithm_oid, public_key.len()) {
            (OID_EC_PUBLIC_KEY, P256_POINT_LEN) => Some(Self::EcdsaP256Sha256),
            (OID_EC_PUBLIC_KEY, P384_POINT_LEN) => Some(Self::EcdsaP384Sha384),
            (OID_ED25519, ED25519_KEY_LEN) => Some(Self::Ed25519),
            _ => None,
        }
    }

    /// The verification algorithm for signatures produced with this scheme.
    pub(crate) fn verification(&self) -> &'static dyn VerificationAlgorithm {
        match self {
            Self::EcdsaP256Sha256 => &ECDSA_P256_SHA256_ASN1,
            Self::EcdsaP384Sha384 => &ECDSA_P384_SHA384_ASN1,
            Self::Ed25519 => &signature::ED25519,
        }
    }

    /// The ECDSA signing algorithm, if this is an ECDSA scheme.
    pub(crate) fn ecdsa_signing(&self) -> Option<&'static EcdsaSigningAlgorithm> {
        match self {
            Self::EcdsaP256Sha256 => Some(&ECDSA_P256_SHA256_ASN1_SIGNING),
            Self::EcdsaP384Sha384 => Some(&ECDSA_P384_SHA384_ASN1_SIGNING),
            Self::Ed25519 => None,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EcdsaP256Sha256 => "ECDSA-P256-SHA256",
            Self::EcdsaP384Sha384 => "ECDSA-P384-SHA384",
            Self::Ed25519 => "Ed25519",
        }
    }
}

impl std::fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_by_oid_and_length() {
        assert_eq!(
            KeyAlgorithm::from_spki(OID_EC_PUBLIC_KEY, &[4u8; 65]),
            Some(KeyAlgorithm::EcdsaP256Sha256)
        );
        assert_eq!(
            KeyAlgorithm::from_spki(OID_EC_PUBLIC_KEY, &[4u8; 97]),
            Some(KeyAlgorithm::EcdsaP384Sha384)
        );
        assert_eq!(
            KeyAlgorithm::from_spki(OID_ED25519, &[0u8; 32]),
            Some(KeyAlgorithm::Ed25519)
        );
    }

    #[test]
    fn test_rejects_unknown_shapes() {
        // Compressed P-256 point
        assert_eq!(KeyAlgorithm::from_spki(OID_EC_PUBLIC_KEY, &[2u8; 33]), None);
        // rsaEncryption
        assert_eq!(KeyAlgorithm::from_spki("1.2.840.113549.1.1.1", &[0u8; 270]), None);
    }
}
