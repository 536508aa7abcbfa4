use std::time::Duration;

use shared_types::MAX_FRAME_SIZE;

/// ALPN protocol identifier negotiated by both sides.
pub const ALPN_PROTOCOL: &[u8] = b"dealer-ledger/1";

/// Secure channel configuration, shared by client and listener.
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    /// Upper bound on resolution plus handshake
    pub connect_timeout: Duration,
    /// Idle timeout before the connection is dropped
    pub idle_timeout: Duration,
    /// Keep-alive interval (`None` to disable)
    pub keep_alive_interval: Option<Duration>,
    /// Largest request or response accepted on a stream
    pub max_message_size: usize,
    /// Maximum concurrent bidirectional streams accepted per connection
    pub max_concurrent_streams: u32,
    /// TLS server name to verify instead of the host part of the target
    pub server_name_override: Option<String>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(30),
            keep_alive_interval: Some(Duration::from_secs(15)),
            max_message_size: MAX_FRAME_SIZE,
            max_concurrent_streams: 100,
            server_name_override: None,
        }
    }
}

impl ChannelConfig {
    /// Config for local tests: short timeouts, verifies `localhost`.
    pub fn for_testing() -> Self {
        Self {
            connect_timeout: Duration::from_secs(2),
            idle_timeout: Duration::from_secs(5),
            keep_alive_interval: None,
            max_message_size: MAX_FRAME_SIZE,
            max_concurrent_streams: 10,
            server_name_override: Some("localhost".to_string()),
        }
    }

    /// Set the TLS server name to verify.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name_override = Some(name.into());
        self
    }
}
