//! Typed message schemas exchanged with cluster services, and the codec
//! that turns them into bytes.
//!
//! Every schema struct implements [`Message`]. Structs are encoded as
//! MessagePack arrays in field order, so the array header of a repeated
//! field is the declared entry count on the wire.

pub mod master;
pub mod rpc_header;
pub mod tserver;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Cursor;

use crate::errors::RpcError;

pub use master::{
    AppStatusCode, AppStatusPb, HostPortPb, ListMastersRequestPb, ListMastersResponsePb,
    ListTabletServersEntryPb, ListTabletServersRequestPb, ListTabletServersResponsePb,
    MasterErrorCode, MasterErrorPb, NodeInstancePb, RaftRole, ServerEntryPb,
    ServerRegistrationPb, TsRegistrationPb, MASTER_SERVICE_NAME,
};
pub use rpc_header::{ErrorStatusPb, RemoteMethodPb, RequestHeader, ResponseHeader, RpcErrorCode};
pub use tserver::{PingRequestPb, PingResponsePb, TABLET_SERVER_SERVICE_NAME};

pub trait Message: Serialize + DeserializeOwned {
    fn encode(&self) -> Result<Vec<u8>, RpcError> {
        Ok(rmp_serde::to_vec(self)?)
    }

    /// Parses exactly one message out of `bytes`. Leftover bytes are an error.
    fn decode(bytes: &[u8]) -> Result<Self, RpcError> {
        let mut cursor = Cursor::new(bytes);
        let message = {
            let mut de = rmp_serde::Deserializer::new(&mut cursor);
            Self::deserialize(&mut de)?
        };

        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            return Err(RpcError::Decode(format!(
                "{} trailing bytes after {} byte message",
                bytes.len() - consumed,
                consumed
            )));
        }
        Ok(message)
    }
}
