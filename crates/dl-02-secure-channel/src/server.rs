//! Peer side of the secure channel.
//!
//! A [`PeerListener`] hands out [`PendingConnection`]s whose handshake the
//! caller drives, so one slow client never holds up the accept loop. Each
//! [`PeerConnection`] yields one [`IncomingRequest`] per stream; reading it
//! gives back the [`PeerResponder`] even when the body is unreadable.

use std::net::SocketAddr;

use quinn::{ConnectionError, ReadToEndError};
use tracing::{debug, warn};

use crate::config::ChannelConfig;
use crate::error::ChannelError;
use crate::tls;

/// A bound QUIC endpoint presenting the peer's certificate chain.
pub struct PeerListener {
    endpoint: quinn::Endpoint,
    max_message_size: usize,
}

impl PeerListener {
    /// Bind to `addr` with the given PEM chain (leaf first) and private key.
    pub fn bind(
        addr: SocketAddr,
        cert_chain_pem: &[u8],
        key_pem: &[u8],
        config: &ChannelConfig,
    ) -> Result<Self, ChannelError> {
        let server_config = tls::server_config(cert_chain_pem, key_pem, config)?;
        let endpoint =
            quinn::Endpoint::server(server_config, addr).map_err(|e| ChannelError::Bind {
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            endpoint,
            max_message_size: config.max_message_size,
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ChannelError> {
        self.endpoint.local_addr().map_err(|e| ChannelError::Bind {
            addr: "local".into(),
            reason: e.to_string(),
        })
    }

    /// Wait for the next connection attempt.
    ///
    /// The TLS handshake has not run yet; see [`PendingConnection::establish`].
    /// Returns `None` once the listener is closed.
    pub async fn accept(&self) -> Option<PendingConnection> {
        let incoming = self.endpoint.accept().await?;
        Some(PendingConnection {
            incoming,
            max_message_size: self.max_message_size,
        })
    }

    /// Stop accepting and close every connection.
    pub fn close(&self) {
        self.endpoint.close(0u32.into(), b"shutdown");
    }
}

/// A connection attempt whose handshake is still outstanding.
pub struct PendingConnection {
    incoming: quinn::Incoming,
    max_message_size: usize,
}

impl PendingConnection {
    /// Remote address of the client.
    pub fn remote_address(&self) -> SocketAddr {
        self.incoming.remote_address()
    }

    /// Complete the handshake.
    pub async fn establish(self) -> Result<PeerConnection, ChannelError> {
        let remote = self.incoming.remote_address();
        match self.incoming.await {
            Ok(connection) => {
                debug!(%remote, "Accepted connection");
                Ok(PeerConnection {
                    connection,
                    max_message_size: self.max_message_size,
                })
            }
            Err(e) => {
                warn!(%remote, error = %e, "Handshake failed");
                Err(ChannelError::Connection {
                    target: remote.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// One accepted client connection.
pub struct PeerConnection {
    connection: quinn::Connection,
    max_message_size: usize,
}

impl PeerConnection {
    /// Remote address of the client.
    pub fn remote_address(&self) -> SocketAddr {
        self.connection.remote_address()
    }

    /// Wait for the next request stream.
    ///
    /// Returns `Ok(None)` when the client closed the connection. The body is
    /// not read here; see [`IncomingRequest::read`].
    pub async fn next_request(&self) -> Result<Option<IncomingRequest>, ChannelError> {
        let (send, recv) = match self.connection.accept_bi().await {
            Ok(streams) => streams,
            Err(
                ConnectionError::ApplicationClosed(_)
                | ConnectionError::ConnectionClosed(_)
                | ConnectionError::LocallyClosed
                | ConnectionError::TimedOut,
            ) => return Ok(None),
            Err(e) => return Err(ChannelError::stream(e)),
        };

        Ok(Some(IncomingRequest {
            recv,
            responder: PeerResponder {
                send,
                max_message_size: self.max_message_size,
            },
        }))
    }
}

/// A request stream whose body has not been read yet.
pub struct IncomingRequest {
    recv: quinn::RecvStream,
    responder: PeerResponder,
}

impl IncomingRequest {
    /// Read the whole request body.
    ///
    /// The responder comes back with every outcome so a failed read can still
    /// be answered. An oversized body stops the client's send half.
    pub async fn read(mut self) -> (Result<Vec<u8>, ChannelError>, PeerResponder) {
        let limit = self.responder.max_message_size;
        let body = match self.recv.read_to_end(limit).await {
            Ok(body) => Ok(body),
            Err(ReadToEndError::TooLong) => {
                // Already finished streams have nothing left to stop.
                let _ = self.recv.stop(0u32.into());
                Err(ChannelError::MessageTooLarge {
                    size: limit + 1,
                    limit,
                })
            }
            Err(ReadToEndError::Read(e)) => Err(ChannelError::stream(e)),
        };
        (body, self.responder)
    }
}

/// Write half of a request stream; consumed by the single response.
pub struct PeerResponder {
    send: quinn::SendStream,
    max_message_size: usize,
}

impl PeerResponder {
    /// Send `response` and finish the stream.
    pub async fn respond(mut self, response: &[u8]) -> Result<(), ChannelError> {
        if response.len() > self.max_message_size {
            return Err(ChannelError::MessageTooLarge {
                size: response.len(),
                limit: self.max_message_size,
            });
        }
        self.send
            .write_all(response)
            .await
            .map_err(ChannelError::stream)?;
        self.send.finish().map_err(ChannelError::stream)
    }
}
