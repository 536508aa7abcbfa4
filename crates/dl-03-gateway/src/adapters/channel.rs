//! [`PeerTransport`] over a verified [`SecureChannel`].

use async_trait::async_trait;
use dl_02_secure_channel::{ChannelError, SecureChannel};

use crate::ports::outbound::PeerTransport;

#[async_trait]
impl PeerTransport for SecureChannel {
    async fn round_trip(&self, request: &[u8]) -> Result<Vec<u8>, ChannelError> {
        SecureChannel::round_trip(self, request).await
    }

    fn close(&self) {
        SecureChannel::close(self)
    }

    fn is_closed(&self) -> bool {
        SecureChannel::is_closed(self)
    }

    fn peer(&self) -> &str {
        self.target()
    }
}
