//! # Node Runtime
//!
//! Wires configuration, credentials, world state, the commit service and the
//! contract into a running peer.
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Load the TLS identity and (optional) client CA
//! 3. Build world state, commit service and contract
//! 4. Seed the ledger if configured
//! 5. Bind the listener and spawn the accept loop

use std::net::SocketAddr;
use std::sync::Arc;

use dl_01_credentials::{certificates_from_pem, Certificate, CredentialSource, FileSystemSource};
use dl_02_secure_channel::PeerListener;
use dl_04_account_contract::AccountContract;
use dl_05_world_state::{InMemoryWorldState, OrderedCommitter, WorldStateStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::NodeConfig;
use crate::errors::NodeError;
use crate::handlers::{ProposalHandler, ProposalValidator};
use crate::server;

/// A running peer.
pub struct NodeRuntime {
    local_addr: SocketAddr,
    handler: Arc<ProposalHandler>,
    shutdown_tx: watch::Sender<bool>,
    server: JoinHandle<()>,
}

impl NodeRuntime {
    /// Start a peer with `config`.
    pub async fn start(config: NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let addr = config.listen_addr()?;

        let source = FileSystemSource;
        let chain_pem = source
            .read(&config.tls.cert_chain_path.to_string_lossy())
            .map_err(|e| NodeError::credentials("TLS certificate chain", e))?;
        let key_pem = source
            .read(&config.tls.key_path.to_string_lossy())
            .map_err(|e| NodeError::credentials("TLS private key", e))?;

        let mut validator = ProposalValidator::new(
            config.network.channel.clone(),
            config.contract.name.clone(),
            config.membership.trusted_msp_ids.iter().cloned(),
        );
        if let Some(path) = &config.membership.client_ca_path {
            validator = validator.with_client_ca(load_ca(&source, &path.to_string_lossy())?);
        }

        let store: Arc<dyn WorldStateStore> = Arc::new(InMemoryWorldState::new());
        let committer = Arc::new(OrderedCommitter::new(Arc::clone(&store)));
        let contract = Arc::new(AccountContract::new(config.contract.name.clone()));
        let handler = Arc::new(ProposalHandler::new(validator, contract, store, committer));

        if config.contract.seed_on_start {
            handler.seed().await.map_err(NodeError::Seed)?;
        }

        let listener = Arc::new(PeerListener::bind(
            addr,
            &chain_pem,
            &key_pem,
            &config.channel_config(),
        )?);
        let local_addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let server = tokio::spawn(server::serve(listener, Arc::clone(&handler), shutdown_rx));

        info!(
            %local_addr,
            channel = %config.network.channel,
            contract = %config.contract.name,
            "Peer started"
        );
        Ok(Self {
            local_addr,
            handler,
            shutdown_tx,
            server,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The request handler, for in-process callers.
    pub fn handler(&self) -> &Arc<ProposalHandler> {
        &self.handler
    }

    /// Stop accepting, close connections and wait for the accept loop.
    pub async fn shutdown(self) {
        info!("Initiating graceful shutdown...");
        if self.shutdown_tx.send(true).is_err() {
            error!("Accept loop already gone");
        }
        if let Err(e) = self.server.await {
            error!(error = %e, "Accept loop panicked");
        }
        info!("Shutdown complete");
    }
}

fn load_ca(source: &dyn CredentialSource, location: &str) -> Result<Certificate, NodeError> {
    let pem = source
        .read(location)
        .map_err(|e| NodeError::credentials("client CA", e))?;
    let der = certificates_from_pem(&pem)
        .map_err(|e| NodeError::credentials("client CA", e))?
        .into_iter()
        .next()
        .unwrap_or_default();
    Certificate::from_der(&der).map_err(|e| NodeError::credentials("client CA", e))
}
