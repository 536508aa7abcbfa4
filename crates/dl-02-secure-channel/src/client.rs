//! Client side of the secure channel.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};

use quinn::{ConnectionError, ReadToEndError, WriteError};
use tracing::{debug, info};

use crate::config::ChannelConfig;
use crate::error::ChannelError;
use crate::tls;
use crate::trust::TrustStore;

/// An authenticated, encrypted connection to one ledger peer.
///
/// Every [`round_trip`](Self::round_trip) uses a fresh bidirectional stream,
/// so concurrent calls do not interleave. The connection is closed on
/// [`close`](Self::close) or on drop, whichever comes first.
pub struct SecureChannel {
    endpoint: quinn::Endpoint,
    connection: quinn::Connection,
    target: String,
    max_message_size: usize,
    closed: AtomicBool,
}

impl SecureChannel {
    /// Dial `target` (`host:port`) and complete a TLS 1.3 handshake.
    ///
    /// The peer chain must validate against `trust` for the server name,
    /// which is the host part of `target` unless the config overrides it.
    pub async fn connect(
        trust: &TrustStore,
        target: &str,
        config: &ChannelConfig,
    ) -> Result<Self, ChannelError> {
        let server_name = match &config.server_name_override {
            Some(name) => name.clone(),
            None => host_part(target)
                .ok_or_else(|| ChannelError::connection(target, "target must be host:port"))?
                .to_string(),
        };

        let remote = tokio::time::timeout(config.connect_timeout, resolve(target))
            .await
            .map_err(|_| ChannelError::connection(target, "address resolution timed out"))??;

        let bind: SocketAddr = if remote.is_ipv6() {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        };
        let mut endpoint = quinn::Endpoint::client(bind)
            .map_err(|e| ChannelError::connection(target, format!("endpoint bind failed: {e}")))?;
        endpoint.set_default_client_config(tls::client_config(trust, config)?);

        debug!(peer = %target, %remote, %server_name, "Dialing peer");
        let connecting = endpoint
            .connect(remote, &server_name)
            .map_err(|e| ChannelError::connection(target, e.to_string()))?;

        let connection = match tokio::time::timeout(config.connect_timeout, connecting).await {
            Ok(Ok(connection)) => connection,
            Ok(Err(e)) => {
                endpoint.close(0u32.into(), b"handshake failed");
                return Err(ChannelError::connection(target, format!("handshake failed: {e}")));
            }
            Err(_) => {
                endpoint.close(0u32.into(), b"timeout");
                return Err(ChannelError::connection(
                    target,
                    format!("timed out after {:?}", config.connect_timeout),
                ));
            }
        };

        info!(peer = %target, %remote, "Secure channel established");
        Ok(Self {
            endpoint,
            connection,
            target: target.to_string(),
            max_message_size: config.max_message_size,
            closed: AtomicBool::new(false),
        })
    }

    /// Send one request and wait for its single response.
    pub async fn round_trip(&self, request: &[u8]) -> Result<Vec<u8>, ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        if request.len() > self.max_message_size {
            return Err(ChannelError::MessageTooLarge {
                size: request.len(),
                limit: self.max_message_size,
            });
        }

        let (mut send, mut recv) = self.connection.open_bi().await.map_err(map_connection)?;
        match send.write_all(request).await {
            Ok(()) => send.finish().map_err(ChannelError::stream)?,
            // The peer refused the body; its answer still arrives on `recv`.
            Err(WriteError::Stopped(code)) => {
                debug!(peer = %self.target, %code, "Peer stopped request stream");
            }
            Err(e) => return Err(ChannelError::stream(e)),
        }

        recv.read_to_end(self.max_message_size)
            .await
            .map_err(|e| match e {
                ReadToEndError::TooLong => ChannelError::MessageTooLarge {
                    size: self.max_message_size + 1,
                    limit: self.max_message_size,
                },
                ReadToEndError::Read(e) => ChannelError::stream(e),
            })
    }

    /// Close the connection. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.connection.close(0u32.into(), b"closed");
        self.endpoint.close(0u32.into(), b"closed");
        debug!(peer = %self.target, "Secure channel closed");
    }

    /// Whether the channel was closed locally or the peer went away.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.connection.close_reason().is_some()
    }

    /// The `host:port` this channel was dialed with.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Resolved peer address.
    pub fn remote_address(&self) -> SocketAddr {
        self.connection.remote_address()
    }
}

impl Drop for SecureChannel {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SecureChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureChannel")
            .field("target", &self.target)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn map_connection(e: ConnectionError) -> ChannelError {
    match e {
        ConnectionError::LocallyClosed
        | ConnectionError::ApplicationClosed(_)
        | ConnectionError::ConnectionClosed(_)
        | ConnectionError::TimedOut => ChannelError::Closed,
        other => ChannelError::stream(other),
    }
}

async fn resolve(target: &str) -> Result<SocketAddr, ChannelError> {
    let mut addrs = tokio::net::lookup_host(target)
        .await
        .map_err(|e| ChannelError::connection(target, format!("address resolution failed: {e}")))?;
    addrs
        .next()
        .ok_or_else(|| ChannelError::connection(target, "address resolved to nothing"))
}

/// Host part of `host:port`, with IPv6 brackets removed.
fn host_part(target: &str) -> Option<&str> {
    let (host, port) = target.rsplit_once(':')?;
    if host.is_empty() || port.is_empty() {
        return None;
    }
    Some(host.trim_start_matches('[').trim_end_matches(']'))
}
