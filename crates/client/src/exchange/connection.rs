use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::UnixStream;
use tracing::debug;

use crate::config::{Endpoint, Limits};
use crate::error::ClientError;

/// Opens byte streams to signer endpoints.
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    fn connect(&self, endpoint: &Endpoint) -> impl Future<Output = io::Result<Self::Stream>> + Send;
}

/// Dials the endpoint path as a Unix domain stream socket.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixConnector;

impl Connector for UnixConnector {
    type Stream = UnixStream;

    async fn connect(&self, endpoint: &Endpoint) -> io::Result<UnixStream> {
        UnixStream::connect(endpoint.path()).await
    }
}

/// A stream bound to one endpoint for a single exchange.
///
/// Dropping the connection closes the underlying socket, so every early
/// return releases it. [`Connection::close`] additionally shuts the stream
/// down gracefully on the success path.
pub struct Connection<S> {
    endpoint: Endpoint,
    stream: S,
    limits: Limits,
    write_closed: bool,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub async fn open<C>(connector: &C, endpoint: &Endpoint, limits: Limits) -> Result<Self, ClientError>
    where
        C: Connector<Stream = S>,
    {
        let stream = with_deadline(limits.timeout, connector.connect(endpoint))
            .await
            .map_err(|source| ClientError::Connection {
                endpoint: endpoint.clone(),
                source,
            })?;
        debug!(%endpoint, "connected");

        Ok(Self {
            endpoint: endpoint.clone(),
            stream,
            limits,
            write_closed: false,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Transmits the whole payload, then half-closes the write side.
    ///
    /// Fails unless the transport accepted exactly `payload.len()` bytes.
    pub async fn send(&mut self, payload: &[u8]) -> Result<(), ClientError> {
        if payload.len() > self.limits.max_request_len {
            return Err(ClientError::TransportWrite {
                endpoint: self.endpoint.clone(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "payload of {} bytes exceeds the {} byte limit",
                        payload.len(),
                        self.limits.max_request_len
                    ),
                ),
            });
        }

        with_deadline(self.limits.timeout, write_fully(&mut self.stream, payload))
            .await
            .map_err(|source| ClientError::TransportWrite {
                endpoint: self.endpoint.clone(),
                source,
            })?;
        debug!(endpoint = %self.endpoint, bytes = payload.len(), "request sent");

        // The peer may already have everything it needs and hung up.
        if let Err(e) = self.stream.shutdown().await {
            debug!(endpoint = %self.endpoint, error = %e, "write half-close failed");
        }
        self.write_closed = true;

        Ok(())
    }

    /// Reads one response, up to the point where the peer closes.
    ///
    /// A response longer than `max_response_len` is rejected, never truncated.
    /// A peer that hangs up without sending anything has failed: the signer
    /// closes silently when it can't produce a signature.
    pub async fn receive(&mut self) -> Result<Vec<u8>, ClientError> {
        let limit = self.limits.max_response_len;
        let mut response = Vec::new();

        let mut reader = (&mut self.stream).take((limit as u64).saturating_add(1));
        with_deadline(self.limits.timeout, reader.read_to_end(&mut response))
            .await
            .map_err(|source| ClientError::TransportRead {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        if response.is_empty() {
            return Err(ClientError::TransportRead {
                endpoint: self.endpoint.clone(),
                source: io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed without a response",
                ),
            });
        }

        if response.len() > limit {
            return Err(ClientError::ResponseTooLarge {
                endpoint: self.endpoint.clone(),
                limit,
            });
        }

        debug!(endpoint = %self.endpoint, bytes = response.len(), "response received");
        Ok(response)
    }

    pub async fn close(mut self) {
        if self.write_closed {
            return;
        }
        if let Err(e) = self.stream.shutdown().await {
            debug!(endpoint = %self.endpoint, error = %e, "shutdown on close failed");
        }
    }
}

async fn write_fully<W>(writer: &mut W, payload: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut sent = 0;
    loop {
        let count = writer.write(&payload[sent..]).await?;
        sent += count;
        if sent == payload.len() {
            break;
        }
        if count == 0 {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {sent} of {} bytes accepted", payload.len()),
            ));
        }
    }
    writer.flush().await
}

async fn with_deadline<T, F>(timeout: Option<Duration>, operation: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, operation).await.unwrap_or_else(|_| {
            Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("timed out after {limit:?}"),
            ))
        }),
        None => operation.await,
    }
}
