use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_KEY_SOCKET: &str = "/tmp/key";
pub const DEFAULT_SIGN_SOCKET: &str = "/tmp/sign";

/// Upper bound for a single response (public key or signature).
pub const DEFAULT_MAX_RESPONSE_LEN: usize = 4096;

/// The signer reads at most this many bytes of a message to sign.
pub const DEFAULT_MAX_REQUEST_LEN: usize = 10 * 1024 * 1024; // 10 MB

/// Filesystem address of a local stream socket served by the signer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Endpoint(PathBuf);

impl Endpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for Endpoint {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for Endpoint {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

/// Client settings. Every field may be omitted from a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub key_endpoint: Endpoint,
    pub signing_endpoint: Endpoint,
    pub max_response_len: usize,
    pub max_request_len: usize,
    /// Deadline applied to each connect, write and read. `None` waits forever.
    pub timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            key_endpoint: Endpoint::from(DEFAULT_KEY_SOCKET),
            signing_endpoint: Endpoint::from(DEFAULT_SIGN_SOCKET),
            max_response_len: DEFAULT_MAX_RESPONSE_LEN,
            max_request_len: DEFAULT_MAX_REQUEST_LEN,
            timeout_ms: None,
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_response_len: self.max_response_len,
            max_request_len: self.max_request_len,
            timeout: self.timeout(),
        }
    }
}

/// Per-exchange bounds derived from [`ClientConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_response_len: usize,
    pub max_request_len: usize,
    pub timeout: Option<Duration>,
}

impl Default for Limits {
    fn default() -> Self {
        ClientConfig::default().limits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_signer_sockets() {
        let config = ClientConfig::default();
        assert_eq!(config.key_endpoint.path(), Path::new("/tmp/key"));
        assert_eq!(config.signing_endpoint.path(), Path::new("/tmp/sign"));
        assert_eq!(config.max_response_len, 4096);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ClientConfig::from_json(
            r#"{"signing_endpoint":"/run/signer/sign","timeout_ms":250}"#,
        )
        .unwrap();
        assert_eq!(config.key_endpoint, Endpoint::from(DEFAULT_KEY_SOCKET));
        assert_eq!(config.signing_endpoint.to_string(), "/run/signer/sign");
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
        assert_eq!(config.max_request_len, DEFAULT_MAX_REQUEST_LEN);
    }

    #[test]
    fn mistyped_field_is_rejected() {
        assert!(ClientConfig::from_json(r#"{"max_response_len":"big"}"#).is_err());
    }
}
