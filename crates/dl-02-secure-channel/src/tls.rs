//! rustls + quinn configuration builders.
//!
//! Both sides pin TLS 1.3, the ring crypto provider and the ledger ALPN id.

use std::sync::Arc;

use quinn::crypto::rustls::{QuicClientConfig, QuicServerConfig};
use rustls::pki_types::{
    CertificateDer, PrivateKeyDer, PrivatePkcs1KeyDer, PrivatePkcs8KeyDer, PrivateSec1KeyDer,
};

use crate::config::{ChannelConfig, ALPN_PROTOCOL};
use crate::error::ChannelError;
use crate::trust::TrustStore;

fn provider() -> Arc<rustls::crypto::CryptoProvider> {
    Arc::new(rustls::crypto::ring::default_provider())
}

fn transport_config(config: &ChannelConfig) -> Result<quinn::TransportConfig, ChannelError> {
    let idle = quinn::IdleTimeout::try_from(config.idle_timeout)
        .map_err(|e| ChannelError::tls(format!("idle timeout out of range: {e}")))?;

    let mut transport = quinn::TransportConfig::default();
    transport.max_idle_timeout(Some(idle));
    transport.keep_alive_interval(config.keep_alive_interval);
    transport.max_concurrent_bidi_streams(config.max_concurrent_streams.into());
    transport.max_concurrent_uni_streams(0u32.into());
    Ok(transport)
}

/// Client config that validates the server chain against `trust`.
pub(crate) fn client_config(
    trust: &TrustStore,
    config: &ChannelConfig,
) -> Result<quinn::ClientConfig, ChannelError> {
    let mut crypto = rustls::ClientConfig::builder_with_provider(provider())
        .with_protocol_versions(&[&rustls::version::TLS13])
        .map_err(ChannelError::tls)?
        .with_root_certificates(trust.roots())
        .with_no_client_auth();
    crypto.alpn_protocols = vec![ALPN_PROTOCOL.to_vec()];

    let quic = QuicClientConfig::try_from(crypto)
        .map_err(|e| ChannelError::tls(format!("client crypto config error: {e:?}")))?;

    let mut client = quinn::ClientConfig::new(Arc::new(quic));
    client.transport_config(Arc::new(transport_config(config)?));
    Ok(client)
}

/// Server config presenting `cert_chain_pem` (leaf first) with `key_pem`.
pub(crate) fn server_config(
    cert_chain_pem: &[u8],
    key_pem: &[u8],
    config: &ChannelConfig,
) -> Result<quinn::ServerConfig, ChannelError> {
    let chain = parse_chain(cert_chain_pem)?;
    let key = parse_private_key(key_pem)?;

    let mut crypto = rustls::ServerConfig::builder_with_provider(provider())
        .with_protocol_versions(&[&rustls::version::TLS13])
        .map_err(ChannelError::tls)?
        .with_no_client_auth()
        .with_single_cert(chain, key)
        .map_err(ChannelError::tls)?;
    crypto.alpn_protocols = vec![ALPN_PROTOCOL.to_vec()];

    let quic = QuicServerConfig::try_from(crypto)
        .map_err(|e| ChannelError::tls(format!("QUIC crypto config error: {e:?}")))?;

    let mut server = quinn::ServerConfig::with_crypto(Arc::new(quic));
    server.transport_config(Arc::new(transport_config(config)?));
    Ok(server)
}

fn parse_chain(cert_chain_pem: &[u8]) -> Result<Vec<CertificateDer<'static>>, ChannelError> {
    let blocks = pem::parse_many(cert_chain_pem).map_err(ChannelError::tls)?;
    let chain: Vec<CertificateDer<'static>> = blocks
        .into_iter()
        .filter(|block| block.tag() == "CERTIFICATE")
        .map(|block| CertificateDer::from(block.into_contents()))
        .collect();
    if chain.is_empty() {
        return Err(ChannelError::tls("no CERTIFICATE block in server chain"));
    }
    Ok(chain)
}

fn parse_private_key(key_pem: &[u8]) -> Result<PrivateKeyDer<'static>, ChannelError> {
    let blocks = pem::parse_many(key_pem).map_err(ChannelError::tls)?;
    for block in blocks {
        let key = match block.tag() {
            "PRIVATE KEY" => PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(block.into_contents())),
            "EC PRIVATE KEY" => PrivateKeyDer::Sec1(PrivateSec1KeyDer::from(block.into_contents())),
            "RSA PRIVATE KEY" => {
                PrivateKeyDer::Pkcs1(PrivatePkcs1KeyDer::from(block.into_contents()))
            }
            _ => continue,
        };
        return Ok(key);
    }
    Err(ChannelError::tls("no private key block in server key"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_01_credentials::testing::TestPki;
    use dl_01_credentials::KeyAlgorithm;

    #[test]
    fn test_chain_keeps_leaf_first() {
        let pki = TestPki::new();
        let leaf = pki.issue("localhost", KeyAlgorithm::EcdsaP256Sha256);
        let bundle = format!("{}{}", leaf.cert_pem, pki.ca_pem());

        let chain = parse_chain(bundle.as_bytes()).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].as_ref(), leaf.cert_der.as_slice());
    }

    #[test]
    fn test_private_key_requires_key_block() {
        let pki = TestPki::new();
        assert!(parse_private_key(pki.ca_pem().as_bytes()).is_err());

        let leaf = pki.issue("localhost", KeyAlgorithm::EcdsaP256Sha256);
        assert!(matches!(
            parse_private_key(leaf.key_pem.as_bytes()),
            Ok(PrivateKeyDer::Pkcs8(_))
        ));
    }

    #[test]
    fn test_server_config_builds() {
        let pki = TestPki::new();
        let leaf = pki.issue("localhost", KeyAlgorithm::EcdsaP256Sha256);
        assert!(server_config(
            leaf.cert_pem.as_bytes(),
            leaf.key_pem.as_bytes(),
            &ChannelConfig::default()
        )
        .is_ok());
    }
}
