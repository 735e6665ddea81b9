use bytes::Bytes;
use log::trace;

use super::{decode_uuid, first_rpc_address};
use crate::call::{frame_request, read_message, CallState, RpcCall, TargetTable};
use crate::envelope::CallResponse;
use crate::errors::RpcError;
use crate::response::ListTabletServersResponse;
use crate::server_info::ServerInfo;
use crate::wire::{
    ListTabletServersRequestPb, ListTabletServersResponsePb, MasterErrorPb, RequestHeader,
    MASTER_SERVICE_NAME,
};

/// Asks the master for every registered tablet server.
#[derive(Debug, Clone)]
pub struct ListTabletServersCall {
    state: CallState,
}

impl ListTabletServersCall {
    pub const METHOD: &'static str = "ListTabletServers";

    pub fn new(master_table: TargetTable) -> Self {
        Self::with_state(CallState::new(master_table))
    }

    pub fn with_state(state: CallState) -> Self {
        Self { state }
    }
}

impl RpcCall for ListTabletServersCall {
    type Response = ListTabletServersResponse;
    type AppError = MasterErrorPb;

    fn state(&self) -> &CallState {
        &self.state
    }

    fn service_name(&self) -> &'static str {
        MASTER_SERVICE_NAME
    }

    fn method(&self) -> &'static str {
        Self::METHOD
    }

    fn serialize(&self, header: &RequestHeader) -> Result<Bytes, RpcError> {
        frame_request(header, &ListTabletServersRequestPb::default())
    }

    fn deserialize(
        &self,
        response: &CallResponse,
        ts_uuid: &str,
    ) -> Result<(ListTabletServersResponse, Option<MasterErrorPb>), RpcError> {
        let resp: ListTabletServersResponsePb = read_message(response)?;

        // The listing covers followers too, so no entry is marked leader.
        let servers = resp
            .servers
            .iter()
            .map(|entry| -> Result<ServerInfo, RpcError> {
                let uuid = decode_uuid(&entry.instance_id.permanent_uuid)?;
                let (host, port) = first_rpc_address(&entry.registration.common, &uuid)?;
                Ok(ServerInfo::new(uuid, host, port, false))
            })
            .collect::<Result<Vec<_>, _>>()?;

        trace!(
            "Decoded {} tablet servers from {} (error={})",
            servers.len(),
            ts_uuid,
            resp.error.is_some()
        );

        let response = ListTabletServersResponse::new(
            self.state.deadline().elapsed_millis(),
            ts_uuid,
            servers,
        );
        Ok((response, resp.error))
    }
}
