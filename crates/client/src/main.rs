use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use signer_client::storage::normalize_path;
use signer_client::{ClientConfig, Endpoint, SignerClient, SigningJob};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// A simple Signer Service consumer client.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// File to sign
    file: PathBuf,
    /// Output file for public key
    #[clap(short = 'p', long = "public-key", default_value = "./public.pem")]
    public_key: PathBuf,
    /// Output file for signature
    #[clap(short = 's', long = "signature", default_value = "./signature.bin")]
    signature: PathBuf,
    /// Socket serving the public key
    #[clap(long, env = "SIGNER_KEY_SOCKET")]
    key_socket: Option<PathBuf>,
    /// Socket accepting payloads to sign
    #[clap(long, env = "SIGNER_SIGN_SOCKET")]
    sign_socket: Option<PathBuf>,
    /// Deadline in milliseconds for each connect, write and read
    #[clap(long, env = "SIGNER_TIMEOUT_MS")]
    timeout_ms: Option<u64>,
    /// JSON file with client settings
    #[clap(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                ClientConfig::from_json(&json)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => ClientConfig::default(),
        };

        if let Some(path) = &self.key_socket {
            config.key_endpoint = Endpoint::from(path.clone());
        }
        if let Some(path) = &self.sign_socket {
            config.signing_endpoint = Endpoint::from(path.clone());
        }
        if self.timeout_ms.is_some() {
            config.timeout_ms = self.timeout_ms;
        }
        Ok(config)
    }

    fn job(&self) -> SigningJob {
        SigningJob {
            input: normalize_path(&self.file),
            public_key: normalize_path(&self.public_key),
            signature: normalize_path(&self.signature),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.client_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let client = SignerClient::new(config);
    match client.run(&args.job()).await {
        Ok(report) => {
            println!(
                "The file '{}' has been signed successfully. You can verify it by: \n\n{}\n",
                report.input.display(),
                report.verify_command()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
