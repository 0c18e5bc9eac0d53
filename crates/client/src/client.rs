use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::exchange::{Connector, UnixConnector, fetch_public_key, sign_payload};
use crate::storage::{PUBLIC_KEY_MODE, SIGNATURE_MODE, read_input, write_output};

/// Resolved paths for one signing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningJob {
    pub input: PathBuf,
    pub public_key: PathBuf,
    pub signature: PathBuf,
}

/// What a successful run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningReport {
    pub input: PathBuf,
    pub public_key: PathBuf,
    pub public_key_len: usize,
    pub signature: PathBuf,
    pub signature_len: usize,
}

impl SigningReport {
    /// Shell command that checks the signature with OpenSSL.
    pub fn verify_command(&self) -> String {
        format!(
            "openssl pkeyutl \\\n    -verify -pubin -inkey {} \\\n    -rawin -in {} \\\n    -sigfile {}",
            self.public_key.display(),
            self.input.display(),
            self.signature.display(),
        )
    }
}

pub struct SignerClient<C = UnixConnector> {
    config: ClientConfig,
    connector: C,
}

impl SignerClient<UnixConnector> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_connector(config, UnixConnector)
    }
}

impl<C: Connector> SignerClient<C> {
    pub fn with_connector(config: ClientConfig, connector: C) -> Self {
        Self { config, connector }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetches the public key and writes it to `destination`.
    ///
    /// Nothing is written unless the whole exchange succeeded.
    pub async fn save_public_key(&self, destination: &Path) -> Result<usize, ClientError> {
        let key = fetch_public_key(
            &self.connector,
            &self.config.key_endpoint,
            self.config.limits(),
        )
        .await?;
        write_output(destination, &key, PUBLIC_KEY_MODE).await?;
        Ok(key.len())
    }

    /// Signs the contents of `input` and writes the signature to `destination`.
    ///
    /// The input is read before the signer is contacted.
    pub async fn sign_file(&self, input: &Path, destination: &Path) -> Result<usize, ClientError> {
        let payload = read_input(input).await?;
        let signature = sign_payload(
            &self.connector,
            &self.config.signing_endpoint,
            &payload,
            self.config.limits(),
        )
        .await?;
        write_output(destination, &signature, SIGNATURE_MODE).await?;
        Ok(signature.len())
    }

    /// Saves the public key, then signs the input. Stops at the first failure.
    pub async fn run(&self, job: &SigningJob) -> Result<SigningReport, ClientError> {
        let public_key_len = self.save_public_key(&job.public_key).await?;
        let signature_len = self.sign_file(&job.input, &job.signature).await?;

        info!(input = %job.input.display(), "signed successfully");
        Ok(SigningReport {
            input: job.input.clone(),
            public_key: job.public_key.clone(),
            public_key_len,
            signature: job.signature.clone(),
            signature_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_command_references_all_paths() {
        let report = SigningReport {
            input: "/data/doc.txt".into(),
            public_key: "/data/public.pem".into(),
            public_key_len: 113,
            signature: "/data/signature.bin".into(),
            signature_len: 64,
        };

        let command = report.verify_command();
        assert!(command.starts_with("openssl pkeyutl"));
        assert!(command.contains("-inkey /data/public.pem"));
        assert!(command.contains("-in /data/doc.txt"));
        assert!(command.contains("-sigfile /data/signature.bin"));
    }
}
