//! The typed call contract.
//!
//! An [`RpcCall`] describes one request/response cycle against a named
//! service method. It owns the encoding of its request body and the decoding
//! of its response body; framing is delegated to [`crate::envelope`] and
//! sending to [`crate::dispatch::CallDispatcher`].

use bytes::Bytes;
use std::time::Duration;

use crate::deadline::DeadlineTracker;
use crate::envelope::{to_frame, CallResponse};
use crate::errors::RpcError;
use crate::response::CallResult;
use crate::wire::{Message, RequestHeader};

pub const MASTER_TABLE_NAME: &str = "sys.catalog";
pub const MASTER_TABLE_ID: &str = "00000000000000000000000000000000";

/// Table a call is bound to. Master calls target the system catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetTable {
    name: String,
    id: String,
}

impl TargetTable {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }

    pub fn master() -> Self {
        Self::new(MASTER_TABLE_NAME, MASTER_TABLE_ID)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_master(&self) -> bool {
        self.id == MASTER_TABLE_ID
    }
}

/// State shared by every call: its target and its deadline tracker.
/// The tracker starts when the state is created.
#[derive(Debug, Clone)]
pub struct CallState {
    table: TargetTable,
    deadline: DeadlineTracker,
}

impl CallState {
    pub fn new(table: TargetTable) -> Self {
        Self::with_tracker(table, DeadlineTracker::new())
    }

    pub fn with_tracker(table: TargetTable, deadline: DeadlineTracker) -> Self {
        Self { table, deadline }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline.set_deadline(timeout);
        self
    }

    pub fn table(&self) -> &TargetTable {
        &self.table
    }

    pub fn deadline(&self) -> &DeadlineTracker {
        &self.deadline
    }
}

pub trait RpcCall: Send + Sync {
    type Response: CallResult + Send;

    /// Service-level error carried inside an otherwise valid response.
    type AppError: Send;

    fn state(&self) -> &CallState;

    fn service_name(&self) -> &'static str;

    fn method(&self) -> &'static str;

    /// Encodes this call's request body behind `header`.
    ///
    /// # Panics
    ///
    /// Panics if `header` is not fully populated.
    fn serialize(&self, header: &RequestHeader) -> Result<Bytes, RpcError>;

    /// Decodes the response body. `ts_uuid` identifies the server that
    /// answered and comes from the transport, not the payload.
    fn deserialize(
        &self,
        response: &CallResponse,
        ts_uuid: &str,
    ) -> Result<(Self::Response, Option<Self::AppError>), RpcError>;

    fn table(&self) -> &TargetTable {
        self.state().table()
    }

    fn deadline_tracker(&self) -> &DeadlineTracker {
        self.state().deadline()
    }
}

/// Frames `body` behind `header`, enforcing the header precondition.
pub fn frame_request<B: Message>(header: &RequestHeader, body: &B) -> Result<Bytes, RpcError> {
    assert!(
        header.is_initialized(),
        "request header must be fully populated before serialize: {:?}",
        header
    );
    to_frame(header, body)
}

/// Parses the service-specific body out of a response.
pub fn read_message<M: Message>(response: &CallResponse) -> Result<M, RpcError> {
    M::decode(response.pb_message())
}
