//! # Signer
//!
//! Wraps exactly one private key. The key material is consumed on construction
//! and never exposed again; only signatures and the public half leave.

use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, Ed25519KeyPair, KeyPair};
use zeroize::Zeroizing;

use super::algorithm::KeyAlgorithm;
use super::errors::CredentialError;

enum SigningKey {
    Ecdsa(EcdsaKeyPair),
    Ed25519(Ed25519KeyPair),
}

/// Produces signatures verifiable with the paired certificate's public key.
pub struct Signer {
    key: SigningKey,
    algorithm: KeyAlgorithm,
    rng: SystemRandom,
}

impl Signer {
    /// Build a signer from a PKCS#8 DER private key.
    ///
    /// The algorithm is detected by trying P-256, P-384 and Ed25519 in turn.
    /// The input buffer is wiped before returning.
    pub fn from_pkcs8(pkcs8: Zeroizing<Vec<u8>>) -> Result<Self, CredentialError> {
        let rng = SystemRandom::new();

        for algorithm in [KeyAlgorithm::EcdsaP256Sha256, KeyAlgorithm::EcdsaP384Sha384] {
            let Some(signing) = algorithm.ecdsa_signing() else {
                continue;
            };
            if let Ok(pair) = EcdsaKeyPair::from_pkcs8(signing, &pkcs8, &rng) {
                return Ok(Self {
                    key: SigningKey::Ecdsa(pair),
                    algorithm,
                    rng,
                });
            }
        }

        match Ed25519KeyPair::from_pkcs8_maybe_unchecked(&pkcs8) {
            Ok(pair) => Ok(Self {
                key: SigningKey::Ed25519(pair),
                algorithm: KeyAlgorithm::Ed25519,
                rng,
            }),
            Err(e) => Err(CredentialError::SignerConstruction(format!(
                "PKCS#8 key is not ECDSA P-256, ECDSA P-384 or Ed25519: {e}"
            ))),
        }
    }

    /// Sign `message`, returning the encoded signature.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CredentialError> {
        match &self.key {
            SigningKey::Ecdsa(pair) => pair
                .sign(&self.rng, message)
                .map(|sig| sig.as_ref().to_vec())
                .map_err(|_| CredentialError::Signing(format!("{} signing failed", self.algorithm))),
            SigningKey::Ed25519(pair) => Ok(pair.sign(message).as_ref().to_vec()),
        }
    }

    /// The signature scheme backing this signer.
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// Public key bytes in the same form a certificate carries them.
    pub fn public_key(&self) -> &[u8] {
        match &self.key {
            SigningKey::Ecdsa(pair) => pair.public_key().as_ref(),
            SigningKey::Ed25519(pair) => pair.public_key().as_ref(),
        }
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
