use std::io;
use std::path::PathBuf;

use crate::config::Endpoint;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Couldn't connect to {endpoint} (make sure the signer is up and running): {source}")]
    Connection {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },
    #[error("Couldn't write to {endpoint}: {source}")]
    TransportWrite {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },
    #[error("Couldn't read from {endpoint}: {source}")]
    TransportRead {
        endpoint: Endpoint,
        #[source]
        source: io::Error,
    },
    #[error("Response from {endpoint} exceeds {limit} bytes")]
    ResponseTooLarge { endpoint: Endpoint, limit: usize },
    #[error("Couldn't save {}: {source}", .path.display())]
    LocalWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Couldn't read {}: {source}", .path.display())]
    LocalRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Field-less discriminant of [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    TransportWrite,
    TransportRead,
    ResponseTooLarge,
    LocalWrite,
    LocalRead,
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Connection { .. } => ErrorKind::Connection,
            ClientError::TransportWrite { .. } => ErrorKind::TransportWrite,
            ClientError::TransportRead { .. } => ErrorKind::TransportRead,
            ClientError::ResponseTooLarge { .. } => ErrorKind::ResponseTooLarge,
            ClientError::LocalWrite { .. } => ErrorKind::LocalWrite,
            ClientError::LocalRead { .. } => ErrorKind::LocalRead,
        }
    }

    /// Process exit status for this failure. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Connection => 2,
            ErrorKind::TransportWrite => 3,
            ErrorKind::TransportRead => 4,
            ErrorKind::ResponseTooLarge => 5,
            ErrorKind::LocalWrite => 6,
            ErrorKind::LocalRead => 7,
        }
    }
}
