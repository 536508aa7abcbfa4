//! # Gateway Session
//!
//! Binds one identity and signer to one peer link, scoped to one network
//! (channel) and one contract. Calls on a session are serialized.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use dl_01_credentials::{Identity, Signer};
use dl_02_secure_channel::ChannelError;
use shared_types::{decode, encode, PeerRequest, PeerResponse, SerializedIdentity};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::errors::{FailureReason, GatewayError};
use crate::domain::options::SessionOptions;
use crate::domain::proposal::{sign_proposal, ProposalTemplate};
use crate::ports::outbound::PeerTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallKind {
    Submit,
    Evaluate,
}

impl CallKind {
    fn name(self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Evaluate => "evaluate",
        }
    }

    fn error(self, transaction: &str, reason: FailureReason) -> GatewayError {
        let transaction = transaction.to_string();
        match self {
            Self::Submit => GatewayError::Submit {
                transaction,
                reason,
            },
            Self::Evaluate => GatewayError::Evaluate {
                transaction,
                reason,
            },
        }
    }
}

/// An authenticated session with one ledger peer.
pub struct Session {
    identity: Identity,
    signer: Signer,
    transport: Box<dyn PeerTransport>,
    template: ProposalTemplate,
    options: SessionOptions,
    calls: Mutex<()>,
    closed: AtomicBool,
}

impl Session {
    /// Open a session over an already verified peer link.
    ///
    /// Fails if the link is closed, either name is empty, or the signer does
    /// not hold the identity's key.
    pub fn open(
        identity: Identity,
        signer: Signer,
        transport: impl PeerTransport + 'static,
        network_name: impl Into<String>,
        contract_name: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let network_name = network_name.into();
        let contract_name = contract_name.into();

        if transport.is_closed() {
            return Err(GatewayError::Session(format!(
                "channel to {} is closed",
                transport.peer()
            )));
        }
        if network_name.is_empty() {
            return Err(GatewayError::Session("network name is empty".into()));
        }
        if contract_name.is_empty() {
            return Err(GatewayError::Session("contract name is empty".into()));
        }
        if !identity.is_paired_with(&signer) {
            return Err(GatewayError::Session(format!(
                "signer does not hold the key of '{}'",
                identity.certificate().subject()
            )));
        }

        let template = ProposalTemplate {
            channel: network_name,
            contract: contract_name,
            creator: SerializedIdentity::new(
                identity.msp_id(),
                identity.certificate().der().to_vec(),
            ),
        };

        info!(
            peer = %transport.peer(),
            channel = %template.channel,
            contract = %template.contract,
            msp_id = %identity.msp_id(),
            "Gateway session opened"
        );

        Ok(Self {
            identity,
            signer,
            transport: Box::new(transport),
            template,
            options: SessionOptions::default(),
            calls: Mutex::new(()),
            closed: AtomicBool::new(false),
        })
    }

    /// Replace the per-operation timeouts.
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Execute `name(args)` for ordering and commit; returns the committed result.
    pub async fn submit(&self, name: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        self.invoke(CallKind::Submit, name, args).await
    }

    /// Execute `name(args)` read-only; nothing is ordered or committed.
    pub async fn evaluate(&self, name: &str, args: &[&str]) -> Result<Vec<u8>, GatewayError> {
        self.invoke(CallKind::Evaluate, name, args).await
    }

    /// Release the channel. Later calls fail with [`GatewayError::SessionClosed`].
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.transport.close();
        info!(peer = %self.transport.peer(), "Gateway session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn network_name(&self) -> &str {
        &self.template.channel
    }

    pub fn contract_name(&self) -> &str {
        &self.template.contract
    }

    async fn invoke(
        &self,
        kind: CallKind,
        name: &str,
        args: &[&str],
    ) -> Result<Vec<u8>, GatewayError> {
        if self.is_closed() {
            return Err(GatewayError::SessionClosed);
        }
        let _turn = self.calls.lock().await;
        if self.is_closed() {
            return Err(GatewayError::SessionClosed);
        }

        let proposal = self.template.build(name, args);
        let tx_id = proposal.tx_id.clone();
        let signed = sign_proposal(&proposal, &self.signer).map_err(|r| kind.error(name, r))?;
        let request = match kind {
            CallKind::Submit => PeerRequest::Submit(signed),
            CallKind::Evaluate => PeerRequest::Evaluate(signed),
        };
        let bytes = encode(&request)
            .map_err(|e| kind.error(name, FailureReason::Protocol(e.to_string())))?;

        debug!(
            tx_id = %tx_id,
            function = name,
            kind = kind.name(),
            "Sending proposal"
        );

        let timeout = match kind {
            CallKind::Submit => self.options.submit_timeout,
            CallKind::Evaluate => self.options.evaluate_timeout,
        };
        let result = self
            .exchange(&bytes, timeout)
            .await
            .and_then(|raw| read_response(&tx_id, &raw));

        match result {
            Ok(payload) => {
                if kind == CallKind::Submit {
                    info!(tx_id = %tx_id, function = name, "Transaction committed");
                }
                Ok(payload)
            }
            Err(reason) => {
                warn!(
                    tx_id = %tx_id,
                    function = name,
                    kind = kind.name(),
                    reason = %reason,
                    "Proposal failed"
                );
                Err(kind.error(name, reason))
            }
        }
    }

    async fn exchange(
        &self,
        request: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Vec<u8>, FailureReason> {
        let call = self.transport.round_trip(request);
        let outcome = match timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| FailureReason::Timeout(limit))?,
            None => call.await,
        };
        outcome.map_err(|e| match e {
            ChannelError::MessageTooLarge { .. } => FailureReason::Protocol(e.to_string()),
            other => FailureReason::Unreachable(other.to_string()),
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

fn read_response(tx_id: &str, raw: &[u8]) -> Result<Vec<u8>, FailureReason> {
    let response: PeerResponse =
        decode(raw).map_err(|e| FailureReason::Protocol(e.to_string()))?;
    match response {
        PeerResponse::Success {
            tx_id: answered,
            payload,
        } => {
            if answered != tx_id {
                return Err(FailureReason::Protocol(format!(
                    "response for transaction {answered}, expected {tx_id}"
                )));
            }
            Ok(payload)
        }
        PeerResponse::Failure {
            status, message, ..
        } => Err(FailureReason::from_status(status, message)),
    }
}
