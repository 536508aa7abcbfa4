//! # Dealer-Ledger Client
//!
//! Command line front end for a gateway session. Credentials and the peer
//! location come from flags or the same environment variables the REST
//! service reads (`MSP_CERT_PATH`, `MSP_KEY_PATH`, `PEER_TLS_CERT`).
//!
//! ```text
//! dl-client submit CreateAccount A003 9998887703 3333 500 active 0 credit "first deposit"
//! dl-client evaluate QueryAccount A003
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dl_01_credentials::CredentialLoader;
use dl_02_secure_channel::{ChannelConfig, SecureChannel, TrustStore};
use dl_03_gateway::{GatewayError, Session, SessionOptions};
use ledger_telemetry::{init_logging, TelemetryConfig};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "dl-client")]
#[command(about = "Submit or evaluate account contract transactions on a ledger peer")]
struct Args {
    /// Client certificate (PEM)
    #[arg(long, env = "MSP_CERT_PATH")]
    cert: PathBuf,

    /// Client private key (PKCS#8 PEM)
    #[arg(long, env = "MSP_KEY_PATH")]
    key: PathBuf,

    /// CA certificate the peer's TLS chain must validate against
    #[arg(long, env = "PEER_TLS_CERT")]
    tls_ca: PathBuf,

    /// Membership tag of the client identity
    #[arg(long, env = "MSP_ID", default_value = "Org1MSP")]
    msp_id: String,

    /// Peer address (host:port)
    #[arg(short, long, env = "PEER_ADDRESS", default_value = "localhost:7051")]
    peer: String,

    /// TLS server name to verify instead of the peer host
    #[arg(long, env = "PEER_HOST_ALIAS")]
    server_name: Option<String>,

    #[arg(short, long, env = "CHANNEL_NAME", default_value = "mychannel")]
    channel: String,

    #[arg(long, env = "CONTRACT_NAME", default_value = "accountcc")]
    contract: String,

    /// Evaluate timeout in seconds
    #[arg(long, default_value_t = 5)]
    evaluate_timeout: u64,

    /// Submit timeout in seconds
    #[arg(long, default_value_t = 60)]
    submit_timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Endorse and commit a transaction
    Submit {
        /// Contract function name
        function: String,
        /// Positional string arguments
        args: Vec<String>,
        /// Extra attempts when the commit loses an MVCC conflict
        #[arg(long, default_value_t = 0)]
        retries: u32,
    },
    /// Run a read-only query; nothing is committed
    Evaluate {
        /// Contract function name
        function: String,
        /// Positional string arguments
        args: Vec<String>,
    },
}

async fn connect(args: &Args) -> Result<Session> {
    let (identity, signer) = CredentialLoader::new(&args.msp_id)
        .load_files(&args.cert, &args.key)
        .context("loading client credentials")?;

    let ca_pem = std::fs::read(&args.tls_ca)
        .with_context(|| format!("reading {}", args.tls_ca.display()))?;
    let trust = TrustStore::from_pem(&ca_pem).context("building trust store")?;

    let mut channel_config = ChannelConfig::default();
    if let Some(name) = &args.server_name {
        channel_config = channel_config.with_server_name(name);
    }
    let channel = SecureChannel::connect(&trust, &args.peer, &channel_config)
        .await
        .with_context(|| format!("connecting to {}", args.peer))?;

    let options = SessionOptions::default()
        .with_evaluate_timeout(Duration::from_secs(args.evaluate_timeout))
        .with_submit_timeout(Duration::from_secs(args.submit_timeout));

    let session = Session::open(identity, signer, channel, &args.channel, &args.contract)
        .context("opening gateway session")?
        .with_options(options);
    Ok(session)
}

async fn submit_with_retries(
    session: &Session,
    function: &str,
    args: &[&str],
    retries: u32,
) -> Result<Vec<u8>, GatewayError> {
    let mut attempt = 0;
    loop {
        match session.submit(function, args).await {
            Err(err) if err.is_retryable() && attempt < retries => {
                attempt += 1;
                warn!(function, attempt, error = %err, "Commit conflict, retrying");
            }
            result => return result,
        }
    }
}

fn print_payload(payload: &[u8]) {
    if payload.is_empty() {
        return;
    }
    match serde_json::from_slice::<serde_json::Value>(payload) {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{}", String::from_utf8_lossy(payload)),
        },
        Err(_) => println!("{}", String::from_utf8_lossy(payload)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&TelemetryConfig::for_service("dl-client")).context("initializing logging")?;

    let session = connect(&args).await?;

    let result = match &args.command {
        Command::Submit {
            function,
            args: call_args,
            retries,
        } => {
            let call_args: Vec<&str> = call_args.iter().map(String::as_str).collect();
            submit_with_retries(&session, function, &call_args, *retries).await
        }
        Command::Evaluate {
            function,
            args: call_args,
        } => {
            let call_args: Vec<&str> = call_args.iter().map(String::as_str).collect();
            session.evaluate(function, &call_args).await
        }
    };
    session.close();

    match result {
        Ok(payload) => {
            info!(peer = %args.peer, "Transaction completed");
            print_payload(&payload);
            Ok(())
        }
        Err(err) => bail!(err),
    }
}
