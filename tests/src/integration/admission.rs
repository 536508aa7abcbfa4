//! # Trust and Admission
//!
//! Failures at the TLS layer surface as channel errors before any proposal is
//! sent; failures at the peer's admission checks surface as rejected calls.

use dl_01_credentials::testing::TestPki;
use dl_01_credentials::KeyAlgorithm;
use dl_02_secure_channel::{ChannelConfig, ChannelError, SecureChannel, TrustStore};
use dl_03_gateway::{AccountClient, FailureReason, GatewayError};

use super::harness::{TestNetwork, CHANNEL, MSP_ID};

fn is_rejected(err: &GatewayError) -> bool {
    matches!(err.reason(), Some(FailureReason::Rejected(_)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_peer_from_untrusted_ca_is_refused() {
    let network = TestNetwork::start().await;
    let stranger = TestPki::new();
    let trust = TrustStore::from_pem(stranger.ca_pem().as_bytes()).unwrap();

    let err = SecureChannel::connect(&trust, &network.target(), &ChannelConfig::for_testing())
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ChannelError::Connection { .. }), "{err}");

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_server_name_mismatch_is_refused() {
    let network = TestNetwork::start().await;
    let trust = TrustStore::from_pem(network.pki.ca_pem().as_bytes()).unwrap();

    // the peer leaf is issued for "localhost"
    let config = ChannelConfig::for_testing().with_server_name("peer0.org1.example.com");
    let err = SecureChannel::connect(&trust, &network.target(), &config)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, ChannelError::Connection { .. }), "{err}");

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_client_from_foreign_ca_is_rejected() {
    let network = TestNetwork::start().await;
    let outsider = TestPki::new().issue("mallory", KeyAlgorithm::EcdsaP256Sha256);

    let session = network.session_as(&outsider, MSP_ID, CHANNEL).await.unwrap();
    let err = session.evaluate("QueryAccount", &["A001"]).await.unwrap_err();
    assert!(is_rejected(&err), "{err}");
    assert!(!err.is_retryable());

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_untrusted_membership_is_rejected() {
    let network = TestNetwork::start().await;
    let credential = network.issue_client("user2");

    let session = network.session_as(&credential, "Org9MSP", CHANNEL).await.unwrap();
    let err = session.submit("InitLedger", &[]).await.unwrap_err();
    assert!(is_rejected(&err), "{err}");

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unknown_channel_is_rejected() {
    let network = TestNetwork::start().await;
    let credential = network.issue_client("user3");

    let session = network.session_as(&credential, MSP_ID, "otherchannel").await.unwrap();
    let err = session.evaluate("AccountExists", &["A001"]).await.unwrap_err();
    assert!(is_rejected(&err), "{err}");

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_closed_session_refuses_calls() {
    let network = TestNetwork::start().await;
    let session = network.session().await;

    session.close();
    session.close();
    assert!(session.is_closed());
    assert_eq!(
        session.evaluate("AccountExists", &["A001"]).await.unwrap_err(),
        GatewayError::SessionClosed
    );

    network.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_oversized_request_leaves_session_usable() {
    let network = TestNetwork::start_with(|config| config.transport.max_message_size = 4096).await;
    let session = network.session().await;

    let padding = "x".repeat(8192);
    let err = session
        .evaluate("QueryAccount", &[padding.as_str()])
        .await
        .unwrap_err();
    assert!(is_rejected(&err), "{err}");
    assert!(err.to_string().contains("4096"), "{err}");

    // Same connection, next stream.
    assert!(!AccountClient::new(&session).account_exists("A001").await.unwrap());

    network.stop().await;
}
