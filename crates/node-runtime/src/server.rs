//! # Peer Server
//!
//! Accept loop over the secure listener. Each connection runs in its own
//! task, handshake included; each request on a connection is read and handled
//! in its own task so slow submits do not block evaluations on the same
//! connection.

use std::net::SocketAddr;
use std::sync::Arc;

use dl_02_secure_channel::{ChannelError, IncomingRequest, PeerListener, PendingConnection};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::handlers::ProposalHandler;

/// Serve requests until `shutdown` flips to `true` or the listener closes.
pub async fn serve(
    listener: Arc<PeerListener>,
    handler: Arc<ProposalHandler>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Peer server accepting connections");
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
            accepted = listener.accept() => match accepted {
                Some(pending) => {
                    tokio::spawn(serve_connection(pending, Arc::clone(&handler)));
                }
                None => break,
            },
        }
    }
    listener.close();
    info!("Peer server stopped");
}

async fn serve_connection(pending: PendingConnection, handler: Arc<ProposalHandler>) {
    let Ok(connection) = pending.establish().await else {
        return;
    };
    let remote = connection.remote_address();
    debug!(%remote, "Connection opened");
    loop {
        match connection.next_request().await {
            Ok(Some(incoming)) => {
                tokio::spawn(serve_request(incoming, Arc::clone(&handler), remote));
            }
            Ok(None) => break,
            Err(e) => {
                warn!(%remote, error = %e, "Connection error");
                break;
            }
        }
    }
    debug!(%remote, "Connection closed");
}

/// Read, handle and answer one request stream.
///
/// An oversized body is answered with `BadRequest`; the connection stays open.
async fn serve_request(incoming: IncomingRequest, handler: Arc<ProposalHandler>, remote: SocketAddr) {
    let (body, responder) = incoming.read().await;
    let response = match body {
        Ok(request) => handler.handle_bytes(&request).await,
        Err(e @ ChannelError::MessageTooLarge { .. }) => handler.bad_request(e),
        Err(e) => {
            warn!(%remote, error = %e, "Failed to read request");
            return;
        }
    };
    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!(%remote, error = %e, "Failed to encode response");
            return;
        }
    };
    if let Err(e) = responder.respond(&response).await {
        warn!(%remote, error = %e, "Failed to send response");
    }
}
