//! # Node Errors

use dl_01_credentials::CredentialError;
use dl_02_secure_channel::ChannelError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that stop the peer from starting.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// TLS identity or client CA could not be loaded.
    #[error("Failed to load {what}: {source}")]
    Credentials {
        what: &'static str,
        #[source]
        source: CredentialError,
    },

    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// `InitLedger` at startup failed.
    #[error("Failed to seed the ledger: {0}")]
    Seed(String),
}

impl NodeError {
    pub(crate) fn credentials(what: &'static str, source: CredentialError) -> Self {
        Self::Credentials { what, source }
    }
}
