pub mod list_masters;
pub mod list_tablet_servers;
pub mod ping;

pub use list_masters::ListMastersCall;
pub use list_tablet_servers::ListTabletServersCall;
pub use ping::PingCall;

use crate::errors::RpcError;
use crate::wire::{HostPortPb, ServerRegistrationPb};

/// Permanent uuids travel as raw bytes and must be valid UTF-8.
pub(crate) fn decode_uuid(raw: &[u8]) -> Result<String, RpcError> {
    Ok(String::from_utf8(raw.to_vec())?)
}

/// First advertised RPC address of a server. Registrations always carry at
/// least one.
pub(crate) fn first_rpc_address(
    registration: &ServerRegistrationPb,
    uuid: &str,
) -> Result<(String, u16), RpcError> {
    let HostPortPb { host, port } = registration.rpc_addresses.first().ok_or_else(|| {
        RpcError::SchemaViolation(format!("server {} has no rpc addresses", uuid))
    })?;

    let port = u16::try_from(*port).map_err(|_| {
        RpcError::SchemaViolation(format!("server {} advertises invalid port {}", uuid, port))
    })?;
    Ok((host.clone(), port))
}
