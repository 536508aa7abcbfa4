//! # Transaction Proposals
//!
//! A proposal names one contract function plus its string arguments, scoped to
//! one ledger network (channel) and one contract. The creator signs the encoded
//! proposal; the resulting `SignedProposal` is what crosses the wire.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::codec;
use crate::errors::WireError;

/// Length of the random nonce mixed into every transaction id.
pub const NONCE_LEN: usize = 24;

/// The creator of a proposal: membership tag plus DER-encoded certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedIdentity {
    /// Organizational membership tag (e.g. `Org1MSP`).
    pub msp_id: String,
    /// DER-encoded X.509 certificate of the creator.
    pub certificate_der: Vec<u8>,
}

impl SerializedIdentity {
    /// Create a serialized identity.
    pub fn new(msp_id: impl Into<String>, certificate_der: Vec<u8>) -> Self {
        Self {
            msp_id: msp_id.into(),
            certificate_der,
        }
    }

    /// Unambiguous byte form used when deriving transaction ids.
    ///
    /// Layout: `u32 BE msp_id length || msp_id || certificate DER`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let msp = self.msp_id.as_bytes();
        let mut out = Vec::with_capacity(4 + msp.len() + self.certificate_der.len());
        out.extend_from_slice(&(msp.len() as u32).to_be_bytes());
        out.extend_from_slice(msp);
        out.extend_from_slice(&self.certificate_der);
        out
    }
}

/// Transaction timestamp as chosen by the proposal creator.
///
/// Peers expose this value to contracts instead of their own clock, which keeps
/// contract execution deterministic across endorsers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxTimestamp {
    /// Seconds since the Unix epoch.
    pub seconds: i64,
    /// Sub-second nanoseconds, `0..1_000_000_000`.
    pub nanos: u32,
}

impl TxTimestamp {
    /// Create a timestamp.
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }
}

/// An unsigned transaction proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Ledger network (channel) the proposal is scoped to.
    pub channel: String,
    /// Contract name on that network.
    pub contract: String,
    /// Contract function to invoke.
    pub function: String,
    /// String arguments; interpretation happens inside the contract.
    pub args: Vec<String>,
    /// Transaction id, `hex(sha256(nonce || creator))`.
    pub tx_id: String,
    /// Random nonce used to derive `tx_id`.
    pub nonce: Vec<u8>,
    /// Creator identity.
    pub creator: SerializedIdentity,
    /// Creator-chosen timestamp.
    pub timestamp: TxTimestamp,
}

impl Proposal {
    /// Encode the proposal into the bytes that get signed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        codec::encode(self)
    }

    /// Check that `tx_id` was derived from this proposal's nonce and creator.
    pub fn has_consistent_tx_id(&self) -> bool {
        self.nonce.len() == NONCE_LEN && compute_tx_id(&self.nonce, &self.creator) == self.tx_id
    }
}

/// A proposal together with the creator's signature over its encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedProposal {
    /// Output of [`Proposal::to_bytes`].
    pub proposal_bytes: Vec<u8>,
    /// Signature produced by the creator's private key.
    pub signature: Vec<u8>,
}

impl SignedProposal {
    /// Decode the embedded proposal.
    pub fn proposal(&self) -> Result<Proposal, WireError> {
        codec::decode(&self.proposal_bytes)
    }
}

/// Derive a transaction id from a nonce and the creator identity.
pub fn compute_tx_id(nonce: &[u8], creator: &SerializedIdentity) -> String {
    let mut hasher = Sha256::new();
    hasher.update(nonce);
    hasher.update(creator.canonical_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> SerializedIdentity {
        SerializedIdentity::new("Org1MSP", vec![0x30, 0x82, 0x01, 0x0A])
    }

    fn proposal() -> Proposal {
        let nonce = vec![7u8; NONCE_LEN];
        let creator = creator();
        Proposal {
            channel: "mychannel".into(),
            contract: "accountcc".into(),
            function: "QueryAccount".into(),
            args: vec!["A001".into()],
            tx_id: compute_tx_id(&nonce, &creator),
            nonce,
            creator,
            timestamp: TxTimestamp::new(1_700_000_000, 0),
        }
    }

    #[test]
    fn test_tx_id_is_hex_sha256() {
        let id = compute_tx_id(&[1u8; NONCE_LEN], &creator());
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tx_id_depends_on_creator() {
        let nonce = [1u8; NONCE_LEN];
        let other = SerializedIdentity::new("Org2MSP", creator().certificate_der);
        assert_ne!(compute_tx_id(&nonce, &creator()), compute_tx_id(&nonce, &other));
    }

    #[test]
    fn test_canonical_bytes_are_unambiguous() {
        let a = SerializedIdentity::new("Org1", b"MSPcert".to_vec());
        let b = SerializedIdentity::new("Org1MSP", b"cert".to_vec());
        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
    }

    #[test]
    fn test_consistent_tx_id() {
        let mut p = proposal();
        assert!(p.has_consistent_tx_id());

        p.tx_id = "00".repeat(32);
        assert!(!p.has_consistent_tx_id());
    }

    #[test]
    fn test_signed_proposal_decodes_embedded_bytes() {
        let p = proposal();
        let signed = SignedProposal {
            proposal_bytes: p.to_bytes().unwrap(),
            signature: vec![1, 2, 3],
        };
        assert_eq!(signed.proposal().unwrap(), p);
    }
}
