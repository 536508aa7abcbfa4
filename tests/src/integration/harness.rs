//! Loopback peer plus client credentials from one test CA.

use std::path::PathBuf;

use dl_01_credentials::testing::{IssuedCredential, TestPki};
use dl_01_credentials::{CredentialLoader, KeyAlgorithm};
use dl_02_secure_channel::{ChannelConfig, ChannelError, SecureChannel, TrustStore};
use dl_03_gateway::{GatewayError, Session};
use node_runtime::{NodeConfig, NodeRuntime};
use tempfile::TempDir;

pub const CHANNEL: &str = "mychannel";
pub const CONTRACT: &str = "accountcc";
pub const MSP_ID: &str = "Org1MSP";

/// A running peer whose TLS leaf and trusted client CA come from `pki`.
pub struct TestNetwork {
    pub pki: TestPki,
    pub peer: NodeRuntime,
    _dir: TempDir,
}

impl TestNetwork {
    pub async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    /// Start a peer after letting `configure` adjust the config.
    pub async fn start_with(configure: impl FnOnce(&mut NodeConfig)) -> Self {
        let pki = TestPki::new();
        let dir = TempDir::new().unwrap();
        let tls = pki.issue("localhost", KeyAlgorithm::EcdsaP256Sha256);

        let mut config = NodeConfig::default();
        config.network.listen_addr = "127.0.0.1:0".to_string();
        config.tls.cert_chain_path = write(&dir, "peer.crt", &tls.cert_pem);
        config.tls.key_path = write(&dir, "peer.key", &tls.key_pem);
        config.membership.client_ca_path = Some(write(&dir, "ca.crt", &pki.ca_pem()));
        configure(&mut config);

        let peer = NodeRuntime::start(config).await.unwrap();
        Self {
            pki,
            peer,
            _dir: dir,
        }
    }

    pub fn target(&self) -> String {
        format!("127.0.0.1:{}", self.peer.local_addr().port())
    }

    /// Dial the peer trusting the network's CA.
    pub async fn connect(&self) -> Result<SecureChannel, ChannelError> {
        let trust = TrustStore::from_pem(self.pki.ca_pem().as_bytes()).unwrap();
        SecureChannel::connect(&trust, &self.target(), &ChannelConfig::for_testing()).await
    }

    /// A client credential issued by the network's CA.
    pub fn issue_client(&self, name: &str) -> IssuedCredential {
        self.pki.issue(name, KeyAlgorithm::EcdsaP256Sha256)
    }

    /// Open a session for `credential` under `msp_id` on `channel`.
    pub async fn session_as(
        &self,
        credential: &IssuedCredential,
        msp_id: &str,
        channel: &str,
    ) -> Result<Session, GatewayError> {
        let (identity, signer) = CredentialLoader::new(msp_id)
            .load(credential.cert_pem.as_bytes(), credential.key_pem.as_bytes())
            .unwrap();
        let channel_link = self.connect().await.unwrap();
        Session::open(identity, signer, channel_link, channel, CONTRACT)
    }

    /// A fresh client session with default membership and channel.
    pub async fn session(&self) -> Session {
        let credential = self.issue_client("user1");
        self.session_as(&credential, MSP_ID, CHANNEL).await.unwrap()
    }

    pub async fn stop(self) {
        self.peer.shutdown().await;
    }
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
