use tracing::info;

use super::connection::{Connection, Connector};
use crate::config::{Endpoint, Limits};
use crate::error::ClientError;

/// Runs one signing round trip: send the whole payload, read the signature.
///
/// 1. Opens a connection to the signing endpoint.
/// 2. Writes all of `payload`; a short write fails the exchange.
/// 3. Reads the signature until the signer hangs up.
pub async fn sign_payload<C>(
    connector: &C,
    endpoint: &Endpoint,
    payload: &[u8],
    limits: Limits,
) -> Result<Vec<u8>, ClientError>
where
    C: Connector,
{
    let mut connection = Connection::open(connector, endpoint, limits).await?;
    connection.send(payload).await?;
    let signature = connection.receive().await?;
    info!(
        endpoint = %connection.endpoint(),
        input_bytes = payload.len(),
        signature_bytes = signature.len(),
        "payload signed"
    );
    connection.close().await;
    Ok(signature)
}
