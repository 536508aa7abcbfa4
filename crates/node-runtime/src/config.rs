//! # Node Configuration
//!
//! Peer configuration loaded from TOML with `DL_*` environment overrides.
//!
//! ```toml
//! [network]
//! listen_addr = "0.0.0.0:7051"
//! channel = "mychannel"
//!
//! [tls]
//! cert_chain_path = "/etc/dl/peer/tls/server.crt"
//! key_path = "/etc/dl/peer/tls/server.key"
//!
//! [membership]
//! trusted_msp_ids = ["Org1MSP"]
//! client_ca_path = "/etc/dl/peer/msp/ca.crt"
//!
//! [contract]
//! name = "accountcc"
//! seed_on_start = true
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dl_02_secure_channel::ChannelConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value is present but unusable.
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Complete peer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub network: NetworkConfig,
    pub tls: TlsConfig,
    pub membership: MembershipConfig,
    pub contract: ContractConfig,
    pub transport: TransportConfig,
}

/// Listener and ledger network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// QUIC listen address.
    pub listen_addr: String,
    /// Channel (ledger network) this peer serves.
    pub channel: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:7051".to_string(),
            channel: "mychannel".to_string(),
        }
    }
}

/// Peer TLS identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// PEM chain, leaf first.
    pub cert_chain_path: PathBuf,
    /// PEM PKCS#8 private key.
    pub key_path: PathBuf,
}

/// Who may submit proposals.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MembershipConfig {
    /// Membership tags accepted on proposal creators.
    pub trusted_msp_ids: Vec<String>,
    /// CA whose signature creator certificates must carry. Unset skips the check.
    pub client_ca_path: Option<PathBuf>,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            trusted_msp_ids: vec!["Org1MSP".to_string()],
            client_ca_path: None,
        }
    }
}

/// Hosted contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub name: String,
    /// Run `InitLedger` once at startup.
    pub seed_on_start: bool,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            name: "accountcc".to_string(),
            seed_on_start: false,
        }
    }
}

/// QUIC transport limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub idle_timeout_secs: u64,
    pub max_message_size: usize,
    pub max_concurrent_streams: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        let channel = ChannelConfig::default();
        Self {
            idle_timeout_secs: channel.idle_timeout.as_secs(),
            max_message_size: channel.max_message_size,
            max_concurrent_streams: channel.max_concurrent_streams,
        }
    }
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing sections take defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `DL_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`.
    ///
    /// # Variables
    ///
    /// - `DL_LISTEN_ADDR`, `DL_CHANNEL_NAME`
    /// - `DL_TLS_CERT`, `DL_TLS_KEY`
    /// - `DL_TRUSTED_MSP_IDS` (comma separated), `DL_CLIENT_CA`
    /// - `DL_CONTRACT_NAME`, `DL_SEED_LEDGER`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("DL_LISTEN_ADDR") {
            self.network.listen_addr = addr;
        }
        if let Some(channel) = lookup("DL_CHANNEL_NAME") {
            self.network.channel = channel;
        }
        if let Some(path) = lookup("DL_TLS_CERT") {
            self.tls.cert_chain_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("DL_TLS_KEY") {
            self.tls.key_path = PathBuf::from(path);
        }
        if let Some(ids) = lookup("DL_TRUSTED_MSP_IDS") {
            self.membership.trusted_msp_ids = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(path) = lookup("DL_CLIENT_CA") {
            self.membership.client_ca_path = Some(PathBuf::from(path));
        }
        if let Some(name) = lookup("DL_CONTRACT_NAME") {
            self.contract.name = name;
        }
        if let Some(flag) = lookup("DL_SEED_LEDGER") {
            self.contract.seed_on_start = match flag.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                other => {
                    return Err(ConfigError::Invalid {
                        field: "DL_SEED_LEDGER",
                        reason: format!("expected true/false, got '{other}'"),
                    })
                }
            };
        }
        Ok(())
    }

    /// Check the configuration is usable before anything is bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;
        if self.network.channel.is_empty() {
            return Err(invalid("network.channel", "must not be empty"));
        }
        if self.contract.name.is_empty() {
            return Err(invalid("contract.name", "must not be empty"));
        }
        if self.tls.cert_chain_path.as_os_str().is_empty() {
            return Err(invalid("tls.cert_chain_path", "must be set"));
        }
        if self.tls.key_path.as_os_str().is_empty() {
            return Err(invalid("tls.key_path", "must be set"));
        }
        if self.membership.trusted_msp_ids.is_empty() {
            return Err(invalid("membership.trusted_msp_ids", "at least one id is required"));
        }
        if self.transport.max_message_size == 0 {
            return Err(invalid("transport.max_message_size", "must be positive"));
        }
        info!(
            listen_addr = %self.network.listen_addr,
            channel = %self.network.channel,
            contract = %self.contract.name,
            "Configuration validated"
        );
        Ok(())
    }

    /// Parsed listen address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.network
            .listen_addr
            .parse()
            .map_err(|e| invalid("network.listen_addr", format!("{e}")))
    }

    /// Channel settings for the listener.
    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            idle_timeout: Duration::from_secs(self.transport.idle_timeout_secs),
            max_message_size: self.transport.max_message_size,
            max_concurrent_streams: self.transport.max_concurrent_streams,
            ..ChannelConfig::default()
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
