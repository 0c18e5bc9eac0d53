//! Stand-in signer service listening on Unix sockets inside a temp dir.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use signer_client::{ClientConfig, Endpoint};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixListener;

pub const PUBLIC_KEY: &[u8] =
    b"-----BEGIN PUBLIC KEY-----\nMCowBQYDK2VwAyEAGb9ECWmEzf6FQbrBZ9w7lshQhqowtrbLDFw4rXAxZuE=\n-----END PUBLIC KEY-----\n";

/// How the signing socket treats each connection.
#[derive(Clone)]
pub enum SignBehavior {
    /// Read the request to EOF, answer with these bytes, hang up.
    Reply(Vec<u8>),
    /// Read a few bytes, then hang up without answering.
    HangUpEarly,
    /// Read the request, then keep the connection open without answering.
    Silent,
}

pub struct FakeSigner {
    pub dir: TempDir,
    pub key_socket: PathBuf,
    pub sign_socket: PathBuf,
    pub key_connections: Arc<AtomicUsize>,
    pub sign_connections: Arc<AtomicUsize>,
    pub requests: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl FakeSigner {
    /// Socket paths are allocated but nothing listens on them.
    pub fn offline() -> Self {
        let dir = TempDir::new().unwrap();
        Self {
            key_socket: dir.path().join("key"),
            sign_socket: dir.path().join("sign"),
            dir,
            key_connections: Arc::new(AtomicUsize::new(0)),
            sign_connections: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn start(behavior: SignBehavior) -> Self {
        let signer = Self::offline();
        signer.serve_key(PUBLIC_KEY.to_vec());
        signer.serve_signing(behavior);
        signer
    }

    pub fn serve_key(&self, key: Vec<u8>) {
        let listener = UnixListener::bind(&self.key_socket).unwrap();
        let connections = self.key_connections.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                connections.fetch_add(1, Ordering::SeqCst);
                let _ = stream.write_all(&key).await;
            }
        });
    }

    pub fn serve_signing(&self, behavior: SignBehavior) {
        let listener = UnixListener::bind(&self.sign_socket).unwrap();
        let connections = self.sign_connections.clone();
        let requests = self.requests.clone();
        tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                connections.fetch_add(1, Ordering::SeqCst);
                match &behavior {
                    SignBehavior::Reply(signature) => {
                        let mut request = Vec::new();
                        let _ = stream.read_to_end(&mut request).await;
                        requests.lock().unwrap().push(request);
                        let _ = stream.write_all(signature).await;
                    }
                    SignBehavior::HangUpEarly => {
                        let mut head = [0u8; 16];
                        let _ = stream.read(&mut head).await;
                    }
                    SignBehavior::Silent => {
                        let mut request = Vec::new();
                        let _ = stream.read_to_end(&mut request).await;
                        held.push(stream);
                    }
                }
            }
        });
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            key_endpoint: Endpoint::from(self.key_socket.clone()),
            signing_endpoint: Endpoint::from(self.sign_socket.clone()),
            ..ClientConfig::default()
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
