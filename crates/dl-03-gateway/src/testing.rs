//! Scripted in-process peer for session tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dl_01_credentials::testing::TestPki;
use dl_01_credentials::{CredentialLoader, Identity, KeyAlgorithm, Signer};
use dl_02_secure_channel::ChannelError;
use shared_types::{decode, encode, PeerRequest, PeerResponse, Proposal};

use crate::ports::outbound::PeerTransport;

type Script = Box<dyn Fn(&PeerRequest, &Proposal) -> PeerResponse + Send + Sync>;

pub(crate) struct ScriptedPeer {
    script: Script,
    delay: Option<Duration>,
    closed: AtomicBool,
}

impl ScriptedPeer {
    pub(crate) fn new(
        script: impl Fn(&PeerRequest, &Proposal) -> PeerResponse + Send + Sync + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            delay: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Answer every request with `payload`.
    pub(crate) fn replying(payload: &'static [u8]) -> Self {
        Self::new(move |_, proposal| PeerResponse::Success {
            tx_id: proposal.tx_id.clone(),
            payload: payload.to_vec(),
        })
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl PeerTransport for ScriptedPeer {
    async fn round_trip(&self, request: &[u8]) -> Result<Vec<u8>, ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let request: PeerRequest = decode(request).map_err(|e| ChannelError::Stream {
            reason: e.to_string(),
        })?;
        let proposal = request.signed_proposal().proposal().map_err(|e| ChannelError::Stream {
            reason: e.to_string(),
        })?;
        let response = (self.script)(&request, &proposal);
        encode(&response).map_err(|e| ChannelError::Stream {
            reason: e.to_string(),
        })
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn peer(&self) -> &str {
        "scripted:0"
    }
}

pub(crate) fn credentials() -> (Identity, Signer) {
    let issued = TestPki::new().issue("client", KeyAlgorithm::EcdsaP256Sha256);
    CredentialLoader::new("Org1MSP")
        .load(issued.cert_pem.as_bytes(), issued.key_pem.as_bytes())
        .unwrap()
}
