pub mod client;
pub mod config;
pub mod error;
pub mod exchange;
pub mod storage;

pub use client::{SignerClient, SigningJob, SigningReport};
pub use config::{ClientConfig, Endpoint, Limits};
pub use error::{ClientError, ErrorKind};
pub use exchange::{Connection, Connector, UnixConnector, fetch_public_key, sign_payload};
