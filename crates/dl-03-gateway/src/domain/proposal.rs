//! # Proposal Construction
//!
//! Builds the proposal for one call and signs its encoded bytes. Each call
//! draws a fresh nonce, so every proposal has a distinct transaction id.

use chrono::Utc;
use dl_01_credentials::Signer;
use rand::RngCore;
use shared_types::{
    compute_tx_id, Proposal, SerializedIdentity, SignedProposal, TxTimestamp, NONCE_LEN,
};

use super::errors::FailureReason;

/// Fixed parts of every proposal a session sends.
#[derive(Debug, Clone)]
pub struct ProposalTemplate {
    pub channel: String,
    pub contract: String,
    pub creator: SerializedIdentity,
}

impl ProposalTemplate {
    /// Build an unsigned proposal for `function(args)`.
    pub fn build(&self, function: &str, args: &[&str]) -> Proposal {
        let mut nonce = vec![0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        let now = Utc::now();

        Proposal {
            channel: self.channel.clone(),
            contract: self.contract.clone(),
            function: function.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            tx_id: compute_tx_id(&nonce, &self.creator),
            nonce,
            creator: self.creator.clone(),
            timestamp: TxTimestamp::new(now.timestamp(), now.timestamp_subsec_nanos()),
        }
    }
}

/// Encode `proposal` and sign the encoded bytes.
pub fn sign_proposal(proposal: &Proposal, signer: &Signer) -> Result<SignedProposal, FailureReason> {
    let proposal_bytes = proposal
        .to_bytes()
        .map_err(|e| FailureReason::Protocol(e.to_string()))?;
    let signature = signer
        .sign(&proposal_bytes)
        .map_err(|e| FailureReason::Rejected(e.to_string()))?;
    Ok(SignedProposal {
        proposal_bytes,
        signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_01_credentials::testing::TestPki;
    use dl_01_credentials::{CredentialLoader, KeyAlgorithm};

    #[test]
    fn test_signed_proposal_verifies_and_ids_are_fresh() {
        let issued = TestPki::new().issue("client", KeyAlgorithm::EcdsaP256Sha256);
        let (identity, signer) = CredentialLoader::new("Org1MSP")
            .load(issued.cert_pem.as_bytes(), issued.key_pem.as_bytes())
            .unwrap();
        let template = ProposalTemplate {
            channel: "mychannel".into(),
            contract: "accountcc".into(),
            creator: SerializedIdentity::new("Org1MSP", issued.cert_der.clone()),
        };

        let first = template.build("QueryAccount", &["A001"]);
        let second = template.build("QueryAccount", &["A001"]);
        assert_ne!(first.tx_id, second.tx_id);
        assert!(first.has_consistent_tx_id());
        assert_eq!(first.args, vec!["A001".to_string()]);

        let signed = sign_proposal(&first, &signer).unwrap();
        identity
            .verify(&signed.proposal_bytes, &signed.signature)
            .unwrap();
        assert_eq!(signed.proposal().unwrap(), first);
    }
}
