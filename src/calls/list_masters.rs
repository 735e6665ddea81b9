use bytes::Bytes;
use log::warn;

use super::{decode_uuid, first_rpc_address};
use crate::call::{frame_request, read_message, CallState, RpcCall, TargetTable};
use crate::envelope::CallResponse;
use crate::errors::RpcError;
use crate::response::ListMastersResponse;
use crate::server_info::ServerInfo;
use crate::wire::{
    ListMastersRequestPb, ListMastersResponsePb, MasterErrorPb, RaftRole, RequestHeader,
    ServerEntryPb, MASTER_SERVICE_NAME,
};

/// Asks a master for the masters of its quorum, with their raft roles.
#[derive(Debug, Clone)]
pub struct ListMastersCall {
    state: CallState,
}

impl ListMastersCall {
    pub const METHOD: &'static str = "ListMasters";

    pub fn new(master_table: TargetTable) -> Self {
        Self::with_state(CallState::new(master_table))
    }

    pub fn with_state(state: CallState) -> Self {
        Self { state }
    }
}

fn master_info(entry: &ServerEntryPb) -> Result<ServerInfo, RpcError> {
    let instance_id = entry
        .instance_id
        .as_ref()
        .ok_or_else(|| RpcError::SchemaViolation("master entry without instance id".to_string()))?;
    let uuid = decode_uuid(&instance_id.permanent_uuid)?;
    let registration = entry.registration.as_ref().ok_or_else(|| {
        RpcError::SchemaViolation(format!("master {} has no registration", uuid))
    })?;
    let (host, port) = first_rpc_address(registration, &uuid)?;
    Ok(ServerInfo::new(uuid, host, port, entry.role == Some(RaftRole::Leader)))
}

impl RpcCall for ListMastersCall {
    type Response = ListMastersResponse;
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
        frame_request(header, &ListMastersRequestPb::default())
    }

    fn deserialize(
        &self,
        response: &CallResponse,
        ts_uuid: &str,
    ) -> Result<(ListMastersResponse, Option<MasterErrorPb>), RpcError> {
        let resp: ListMastersResponsePb = read_message(response)?;

        let mut masters = Vec::with_capacity(resp.masters.len());
        for entry in &resp.masters {
            // Peers the answering master could not reach carry only an error.
            if let Some(status) = &entry.error {
                warn!(
                    "Skipping unreachable master reported by {}: {:?}",
                    ts_uuid, status
                );
                continue;
            }
            masters.push(master_info(entry)?);
        }

        let response =
            ListMastersResponse::new(self.state.deadline().elapsed_millis(), ts_uuid, masters);
        Ok((response, resp.error))
    }
}
