use thiserror::Error;

/// Errors raised by the secure channel and the peer listener.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The trust root input is unusable.
    #[error("Trust store error: {reason}")]
    TrustStore { reason: String },

    /// Resolution, dial, handshake or chain validation failed.
    #[error("Connection to {target} failed: {reason}")]
    Connection { target: String, reason: String },

    /// The channel was closed locally or by the peer.
    #[error("Channel closed")]
    Closed,

    /// Opening, writing or reading a stream failed.
    #[error("Stream error: {reason}")]
    Stream { reason: String },

    /// A message exceeds the configured size limit.
    #[error("Message too large: {size} bytes exceeds limit of {limit} bytes")]
    MessageTooLarge { size: usize, limit: usize },

    /// The listener could not bind.
    #[error("Failed to bind to {addr}: {reason}")]
    Bind { addr: String, reason: String },

    /// TLS or QUIC configuration could not be built.
    #[error("TLS configuration error: {reason}")]
    Tls { reason: String },
}

impl ChannelError {
    pub(crate) fn connection(target: &str, reason: impl Into<String>) -> Self {
        Self::Connection {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn stream(reason: impl ToString) -> Self {
        Self::Stream {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn tls(reason: impl ToString) -> Self {
        Self::Tls {
            reason: reason.to_string(),
        }
    }
}
