//! # Outbound Ports

use async_trait::async_trait;
use dl_02_secure_channel::ChannelError;

/// One-request-one-response link to a ledger peer.
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Send an encoded request and wait for the encoded response.
    async fn round_trip(&self, request: &[u8]) -> Result<Vec<u8>, ChannelError>;

    /// Release the link. Idempotent.
    fn close(&self);

    fn is_closed(&self) -> bool;

    /// Peer address for logs.
    fn peer(&self) -> &str;
}
