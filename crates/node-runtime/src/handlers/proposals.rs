//! # Proposal Handler
//!
//! Admits a request, simulates the contract against current world state and
//! answers. Evaluations return the simulation result directly; submissions
//! hand their read/write set to the commit service and answer after commit.

use std::sync::Arc;

use chrono::Utc;
use dl_04_account_contract::{ContractError, ContractInvoker, Function};
use dl_05_world_state::{
    CommitError, CommitReceipt, CommitService, Transaction, TxSimulator, WorldStateStore,
};
use ledger_telemetry::{
    log_tx_event, HistogramTimer, COMMIT_CONFLICTS, CONTRACT_FAILURES, PROPOSALS_RECEIVED,
    PROPOSALS_REJECTED, PROPOSAL_DURATION, TRANSACTIONS_COMMITTED,
};
use rand::RngCore;
use shared_types::{
    compute_tx_id, decode, encode, FailureStatus, PeerRequest, PeerResponse, Proposal,
    SerializedIdentity, TxTimestamp, WireError, NONCE_LEN,
};
use tracing::{debug, info, warn};

use super::admission::ProposalValidator;
use crate::adapters::SimulationStub;

/// Membership tag on transactions the peer originates itself.
const PEER_MSP_ID: &str = "peer";

/// Executes admitted proposals for one contract.
pub struct ProposalHandler {
    validator: ProposalValidator,
    contract: Arc<dyn ContractInvoker>,
    store: Arc<dyn WorldStateStore>,
    committer: Arc<dyn CommitService>,
}

impl ProposalHandler {
    pub fn new(
        validator: ProposalValidator,
        contract: Arc<dyn ContractInvoker>,
        store: Arc<dyn WorldStateStore>,
        committer: Arc<dyn CommitService>,
    ) -> Self {
        Self {
            validator,
            contract,
            store,
            committer,
        }
    }

    /// Decode one framed request and produce the framed response.
    pub async fn handle_bytes(&self, raw: &[u8]) -> Result<Vec<u8>, WireError> {
        match decode::<PeerRequest>(raw) {
            Ok(request) => encode(&self.handle(request).await),
            Err(e) => self.bad_request(e),
        }
    }

    /// Framed `BadRequest` answer for a request that never got decoded.
    pub fn bad_request(&self, reason: impl std::fmt::Display) -> Result<Vec<u8>, WireError> {
        PROPOSALS_REJECTED.with_label_values(&["bad_request"]).inc();
        warn!(error = %reason, "Unreadable request");
        encode(&PeerResponse::failure(
            "",
            FailureStatus::BadRequest,
            reason.to_string(),
        ))
    }

    /// Process one request.
    pub async fn handle(&self, request: PeerRequest) -> PeerResponse {
        let kind = request.kind();
        PROPOSALS_RECEIVED.with_label_values(&[kind]).inc();
        let _timer = HistogramTimer::new(&PROPOSAL_DURATION.with_label_values(&[kind]));

        let signed = request.signed_proposal();
        let proposal = match self.validator.admit(signed, Utc::now().timestamp()) {
            Ok(proposal) => proposal,
            Err(rejection) => {
                PROPOSALS_REJECTED
                    .with_label_values(&[rejection.label()])
                    .inc();
                let tx_id = signed.proposal().map(|p| p.tx_id).unwrap_or_default();
                warn!(
                    tx_id = %tx_id,
                    kind,
                    status = ?rejection.status,
                    reason = %rejection.message,
                    "Proposal rejected"
                );
                return PeerResponse::failure(tx_id, rejection.status, rejection.message);
            }
        };

        let (payload, tx) = match self.simulate(&proposal) {
            Ok(outcome) => outcome,
            Err(e) => return contract_failure(&proposal, e),
        };

        match request {
            PeerRequest::Evaluate(_) => {
                debug!(tx_id = %proposal.tx_id, function = %proposal.function, "Evaluated");
                PeerResponse::Success {
                    tx_id: proposal.tx_id,
                    payload,
                }
            }
            PeerRequest::Submit(_) => match self.commit(tx).await {
                Ok(receipt) => {
                    log_tx_event!(
                        info,
                        "Submitted transaction committed",
                        receipt.tx_id,
                        proposal.function,
                        version = receipt.version.0,
                        keys_written = receipt.keys_written
                    );
                    PeerResponse::Success {
                        tx_id: proposal.tx_id,
                        payload,
                    }
                }
                Err(e) => commit_failure(&proposal, e),
            },
        }
    }

    /// Run `InitLedger` as a transaction originated by the peer itself.
    pub async fn seed(&self) -> Result<CommitReceipt, String> {
        let mut nonce = vec![0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce);
        let creator = SerializedIdentity::new(PEER_MSP_ID, Vec::new());
        let now = Utc::now();
        let timestamp = TxTimestamp::new(now.timestamp(), now.timestamp_subsec_nanos());

        let mut simulator = TxSimulator::new(
            Arc::clone(&self.store),
            compute_tx_id(&nonce, &creator),
            timestamp,
        );
        self.contract
            .invoke(
                &mut SimulationStub::new(&mut simulator),
                Function::InitLedger.name(),
                &[],
            )
            .map_err(|e| e.to_string())?;

        let receipt = self
            .commit(simulator.into_transaction())
            .await
            .map_err(|e| e.to_string())?;
        info!(
            tx_id = %receipt.tx_id,
            keys_written = receipt.keys_written,
            "Ledger seeded"
        );
        Ok(receipt)
    }

    fn simulate(&self, proposal: &Proposal) -> Result<(Vec<u8>, Transaction), ContractError> {
        let mut simulator = TxSimulator::new(
            Arc::clone(&self.store),
            proposal.tx_id.clone(),
            proposal.timestamp,
        );
        let payload = self.contract.invoke(
            &mut SimulationStub::new(&mut simulator),
            &proposal.function,
            &proposal.args,
        )?;
        Ok((payload, simulator.into_transaction()))
    }

    async fn commit(&self, tx: Transaction) -> Result<CommitReceipt, CommitError> {
        let outcome = self.committer.commit(tx).await;
        match &outcome {
            Ok(_) => TRANSACTIONS_COMMITTED.inc(),
            Err(CommitError::Conflict { .. }) => COMMIT_CONFLICTS.inc(),
            Err(_) => {}
        }
        outcome
    }
}

fn contract_failure(proposal: &Proposal, error: ContractError) -> PeerResponse {
    let function = proposal
        .function
        .parse::<Function>()
        .map(|f| f.name())
        .unwrap_or("unknown");
    CONTRACT_FAILURES.with_label_values(&[function]).inc();

    let status = match error {
        ContractError::Ledger { .. } => FailureStatus::Internal,
        _ => FailureStatus::ContractFailure,
    };
    log_tx_event!(
        warn,
        "Contract invocation failed",
        proposal.tx_id,
        proposal.function,
        error = %error
    );
    PeerResponse::failure(proposal.tx_id.clone(), status, error.to_string())
}

fn commit_failure(proposal: &Proposal, error: CommitError) -> PeerResponse {
    let status = match error {
        CommitError::Conflict { .. } => FailureStatus::CommitConflict,
        CommitError::DuplicateTransaction { .. } => FailureStatus::DuplicateTransaction,
        CommitError::Store { .. } => FailureStatus::Internal,
    };
    log_tx_event!(
        warn,
        "Commit failed",
        proposal.tx_id,
        proposal.function,
        error = %error
    );
    PeerResponse::failure(proposal.tx_id.clone(), status, error.to_string())
}
