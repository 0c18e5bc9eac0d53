mod connection;
mod key;
mod sign;

pub use connection::{Connection, Connector, UnixConnector};
pub use key::fetch_public_key;
pub use sign::sign_payload;
