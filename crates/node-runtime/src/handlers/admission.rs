//! # Proposal Admission
//!
//! A proposal is executed only if it targets this peer's channel and contract,
//! its transaction id derives from its nonce and creator, the creator belongs
//! to a trusted membership and holds a currently valid certificate (signed by
//! the configured client CA, when one is set), and the signature covers the
//! exact proposal bytes.

use std::collections::HashSet;

use dl_01_credentials::{Certificate, Identity};
use shared_types::{FailureStatus, Proposal, SignedProposal};
use tracing::debug;

/// Why a proposal was refused before execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: FailureStatus,
    pub message: String,
}

impl Rejection {
    fn new(status: FailureStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self.status {
            FailureStatus::BadRequest => "bad_request",
            FailureStatus::Unauthorized => "unauthorized",
            FailureStatus::UnknownTarget => "unknown_target",
            _ => "other",
        }
    }
}

/// Admission checks for one channel and contract.
#[derive(Debug, Clone)]
pub struct ProposalValidator {
    channel: String,
    contract: String,
    trusted_msp_ids: HashSet<String>,
    client_ca: Option<Certificate>,
}

impl ProposalValidator {
    pub fn new(
        channel: impl Into<String>,
        contract: impl Into<String>,
        trusted_msp_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            contract: contract.into(),
            trusted_msp_ids: trusted_msp_ids.into_iter().collect(),
            client_ca: None,
        }
    }

    /// Require creator certificates to be signed by `ca`.
    pub fn with_client_ca(mut self, ca: Certificate) -> Self {
        self.client_ca = Some(ca);
        self
    }

    /// Decode and admit `signed`, checking validity at `now` (unix seconds).
    pub fn admit(&self, signed: &SignedProposal, now: i64) -> Result<Proposal, Rejection> {
        let proposal = signed
            .proposal()
            .map_err(|e| Rejection::new(FailureStatus::BadRequest, e.to_string()))?;

        if proposal.channel != self.channel {
            return Err(Rejection::new(
                FailureStatus::UnknownTarget,
                format!("channel '{}' is not served by this peer", proposal.channel),
            ));
        }
        if proposal.contract != self.contract {
            return Err(Rejection::new(
                FailureStatus::UnknownTarget,
                format!("contract '{}' is not installed", proposal.contract),
            ));
        }
        if !proposal.has_consistent_tx_id() {
            return Err(Rejection::new(
                FailureStatus::BadRequest,
                format!(
                    "transaction id {} does not match nonce and creator",
                    proposal.tx_id
                ),
            ));
        }

        let creator = &proposal.creator;
        if !self.trusted_msp_ids.contains(&creator.msp_id) {
            return Err(Rejection::new(
                FailureStatus::Unauthorized,
                format!("membership '{}' is not trusted", creator.msp_id),
            ));
        }

        let certificate = Certificate::from_der(&creator.certificate_der)
            .map_err(|e| Rejection::new(FailureStatus::Unauthorized, e.to_string()))?;
        if !certificate.is_valid_at(now) {
            return Err(Rejection::new(
                FailureStatus::Unauthorized,
                format!("certificate '{}' is not valid now", certificate.subject()),
            ));
        }
        if let Some(ca) = &self.client_ca {
            certificate
                .verify_issued_by(ca)
                .map_err(|e| Rejection::new(FailureStatus::Unauthorized, e.to_string()))?;
        }

        let identity = Identity::new(creator.msp_id.clone(), certificate);
        identity
            .verify(&signed.proposal_bytes, &signed.signature)
            .map_err(|e| Rejection::new(FailureStatus::Unauthorized, e.to_string()))?;

        debug!(
            tx_id = %proposal.tx_id,
            msp_id = %identity.msp_id(),
            subject = %identity.certificate().subject(),
            "Proposal admitted"
        );
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_01_credentials::testing::{self_signed, TestPki};
    use dl_01_credentials::{CredentialLoader, KeyAlgorithm, Signer};
    use shared_types::{compute_tx_id, SerializedIdentity, TxTimestamp, NONCE_LEN};

    const NOW: i64 = 1_760_000_000;

    struct Client {
        cert_der: Vec<u8>,
        signer: Signer,
    }

    fn client(pki: &TestPki) -> Client {
        let issued = pki.issue("client", KeyAlgorithm::EcdsaP256Sha256);
        let signer = CredentialLoader::new("Org1MSP")
            .load_signer(issued.key_pem.as_bytes())
            .unwrap();
        Client {
            cert_der: issued.cert_der,
            signer,
        }
    }

    fn proposal(client: &Client, msp_id: &str, channel: &str, contract: &str) -> Proposal {
        let nonce = vec![1u8; NONCE_LEN];
        let creator = SerializedIdentity::new(msp_id, client.cert_der.clone());
        Proposal {
            channel: channel.into(),
            contract: contract.into(),
            function: "QueryAccount".into(),
            args: vec!["A001".into()],
            tx_id: compute_tx_id(&nonce, &creator),
            nonce,
            creator,
            timestamp: TxTimestamp::new(NOW, 0),
        }
    }

    fn sign(client: &Client, proposal: &Proposal) -> SignedProposal {
        let proposal_bytes = proposal.to_bytes().unwrap();
        let signature = client.signer.sign(&proposal_bytes).unwrap();
        SignedProposal {
            proposal_bytes,
            signature,
        }
    }

    fn validator() -> ProposalValidator {
        ProposalValidator::new("mychannel", "accountcc", ["Org1MSP".to_string()])
    }

    fn now_for(client: &Client) -> i64 {
        let cert = Certificate::from_der(&client.cert_der).unwrap();
        cert.not_before() + 60
    }

    #[test]
    fn test_admits_well_formed_proposal() {
        let pki = TestPki::new();
        let client = client(&pki);
        let original = proposal(&client, "Org1MSP", "mychannel", "accountcc");
        let admitted = validator()
            .with_client_ca(Certificate::from_der(&pki.ca_der()).unwrap())
            .admit(&sign(&client, &original), now_for(&client))
            .unwrap();
        assert_eq!(admitted, original);
    }

    #[test]
    fn test_unknown_channel_and_contract() {
        let client = client(&TestPki::new());
        let now = now_for(&client);
        for (channel, contract) in [("otherchannel", "accountcc"), ("mychannel", "othercc")] {
            let signed = sign(&client, &proposal(&client, "Org1MSP", channel, contract));
            let rejection = validator().admit(&signed, now).unwrap_err();
            assert_eq!(rejection.status, FailureStatus::UnknownTarget);
        }
    }

    #[test]
    fn test_untrusted_membership() {
        let client = client(&TestPki::new());
        let signed = sign(&client, &proposal(&client, "Org9MSP", "mychannel", "accountcc"));
        let rejection = validator().admit(&signed, now_for(&client)).unwrap_err();
        assert_eq!(rejection.status, FailureStatus::Unauthorized);
        assert_eq!(rejection.label(), "unauthorized");
    }

    #[test]
    fn test_forged_tx_id() {
        let client = client(&TestPki::new());
        let mut forged = proposal(&client, "Org1MSP", "mychannel", "accountcc");
        forged.tx_id = "00".repeat(32);
        let rejection = validator()
            .admit(&sign(&client, &forged), now_for(&client))
            .unwrap_err();
        assert_eq!(rejection.status, FailureStatus::BadRequest);
    }

    #[test]
    fn test_tampered_bytes_fail_signature() {
        let client = client(&TestPki::new());
        let signed = sign(&client, &proposal(&client, "Org1MSP", "mychannel", "accountcc"));

        let mut tampered = proposal(&client, "Org1MSP", "mychannel", "accountcc");
        tampered.args = vec!["A002".into()];
        let forged = SignedProposal {
            proposal_bytes: tampered.to_bytes().unwrap(),
            signature: signed.signature,
        };
        let rejection = validator().admit(&forged, now_for(&client)).unwrap_err();
        assert_eq!(rejection.status, FailureStatus::Unauthorized);
    }

    #[test]
    fn test_certificate_outside_ca_is_refused() {
        let pki = TestPki::new();
        let stranger = self_signed("stranger", KeyAlgorithm::EcdsaP256Sha256);
        let client = Client {
            signer: CredentialLoader::new("Org1MSP")
                .load_signer(stranger.key_pem.as_bytes())
                .unwrap(),
            cert_der: stranger.cert_der,
        };
        let signed = sign(&client, &proposal(&client, "Org1MSP", "mychannel", "accountcc"));
        let rejection = validator()
            .with_client_ca(Certificate::from_der(&pki.ca_der()).unwrap())
            .admit(&signed, now_for(&client))
            .unwrap_err();
        assert_eq!(rejection.status, FailureStatus::Unauthorized);
    }

    #[test]
    fn test_expired_certificate() {
        let client = client(&TestPki::new());
        let cert = Certificate::from_der(&client.cert_der).unwrap();
        let signed = sign(&client, &proposal(&client, "Org1MSP", "mychannel", "accountcc"));
        let rejection = validator()
            .admit(&signed, cert.not_after() + 1)
            .unwrap_err();
        assert_eq!(rejection.status, FailureStatus::Unauthorized);
    }

    #[test]
    fn test_garbage_proposal_bytes() {
        let signed = SignedProposal {
            proposal_bytes: vec![0xFF; 8],
            signature: vec![],
        };
        let rejection = validator().admit(&signed, NOW).unwrap_err();
        assert_eq!(rejection.status, FailureStatus::BadRequest);
    }
}
