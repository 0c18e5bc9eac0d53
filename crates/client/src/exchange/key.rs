use tracing::info;

use super::connection::{Connection, Connector};
use crate::config::{Endpoint, Limits};
use crate::error::ClientError;

/// Retrieves the signer's public key.
///
/// The key endpoint needs no request: it writes the key and hangs up.
pub async fn fetch_public_key<C>(connector: &C, endpoint: &Endpoint, limits: Limits) -> Result<Vec<u8>, ClientError>
where
    C: Connector,
{
    let mut connection = Connection::open(connector, endpoint, limits).await?;
    let key = connection.receive().await?;
    info!(endpoint = %connection.endpoint(), bytes = key.len(), "public key received");
    connection.close().await;
    Ok(key)
}
