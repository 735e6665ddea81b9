use bytes::Bytes;
use std::convert::Infallible;

use crate::call::{frame_request, read_message, CallState, RpcCall, TargetTable};
use crate::envelope::CallResponse;
use crate::errors::RpcError;
use crate::response::PingResponse;
use crate::wire::{PingRequestPb, PingResponsePb, RequestHeader, TABLET_SERVER_SERVICE_NAME};

/// Liveness probe against a tablet server. The service defines no
/// application error for it.
#[derive(Debug, Clone)]
pub struct PingCall {
    state: CallState,
}

impl PingCall {
    pub const METHOD: &'static str = "Ping";

    pub fn new(table: TargetTable) -> Self {
        Self::with_state(CallState::new(table))
    }

    pub fn with_state(state: CallState) -> Self {
        Self { state }
    }
}

impl RpcCall for PingCall {
    type Response = PingResponse;
    type AppError = Infallible;

    fn state(&self) -> &CallState {
        &self.state
    }

    fn service_name(&self) -> &'static str {
        TABLET_SERVER_SERVICE_NAME
    }

    fn method(&self) -> &'static str {
        Self::METHOD
    }

    fn serialize(&self, header: &RequestHeader) -> Result<Bytes, RpcError> {
        frame_request(header, &PingRequestPb::default())
    }

    fn deserialize(
        &self,
        response: &CallResponse,
        ts_uuid: &str,
    ) -> Result<(PingResponse, Option<Infallible>), RpcError> {
        let _: PingResponsePb = read_message(response)?;
        Ok((
            PingResponse::new(self.state.deadline().elapsed_millis(), ts_uuid),
            None,
        ))
    }
}
