//! Schemas of the master (control-plane) service.

use serde_derive::{Deserialize, Serialize};

use super::Message;

pub const MASTER_SERVICE_NAME: &str = "yb.master.MasterService";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppStatusCode {
    Ok,
    NotFound,
    Corruption,
    NotSupported,
    InvalidArgument,
    IoError,
    AlreadyPresent,
    RuntimeError,
    NetworkError,
    IllegalState,
    NotAuthorized,
    Aborted,
    RemoteError,
    ServiceUnavailable,
    TimedOut,
    Uninitialized,
    ConfigurationError,
    Incomplete,
    EndOfFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStatusPb {
    pub code: AppStatusCode,
    pub message: Option<String>,
    pub posix_code: Option<i32>,
}

impl AppStatusPb {
    pub fn new(code: AppStatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            posix_code: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MasterErrorCode {
    UnknownError,
    InvalidSchema,
    ObjectNotFound,
    ObjectAlreadyPresent,
    TooManyTablets,
    CatalogManagerNotInitialized,
    NotTheLeader,
    ReplicationFactorTooHigh,
    TableNotRunning,
    InvalidRequest,
    CanRetryLoadBalanceCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterErrorPb {
    pub code: MasterErrorCode,
    pub status: AppStatusPb,
}

impl MasterErrorPb {
    pub fn new(code: MasterErrorCode, status: AppStatusPb) -> Self {
        Self { code, status }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPortPb {
    pub host: String,
    pub port: u32,
}

impl HostPortPb {
    pub fn new(host: impl Into<String>, port: u32) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInstancePb {
    pub permanent_uuid: Vec<u8>,
    pub instance_seqno: i64,
}

impl NodeInstancePb {
    pub fn new(permanent_uuid: impl Into<Vec<u8>>, instance_seqno: i64) -> Self {
        Self {
            permanent_uuid: permanent_uuid.into(),
            instance_seqno,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRegistrationPb {
    pub rpc_addresses: Vec<HostPortPb>,
    pub http_addresses: Vec<HostPortPb>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsRegistrationPb {
    pub common: ServerRegistrationPb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaftRole {
    UnknownRole,
    Follower,
    Leader,
    Learner,
    NonParticipant,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTabletServersRequestPb {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTabletServersEntryPb {
    pub instance_id: NodeInstancePb,
    pub registration: TsRegistrationPb,
    pub millis_since_heartbeat: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTabletServersResponsePb {
    pub error: Option<MasterErrorPb>,
    pub servers: Vec<ListTabletServersEntryPb>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMastersRequestPb {}

/// One master as seen by the answering master. `error` is set when the
/// peer could not be reached, in which case the other fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEntryPb {
    pub error: Option<AppStatusPb>,
    pub instance_id: Option<NodeInstancePb>,
    pub registration: Option<ServerRegistrationPb>,
    pub role: Option<RaftRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMastersResponsePb {
    pub error: Option<MasterErrorPb>,
    pub masters: Vec<ServerEntryPb>,
}

impl Message for AppStatusPb {}
impl Message for MasterErrorPb {}
impl Message for HostPortPb {}
impl Message for NodeInstancePb {}
impl Message for ServerRegistrationPb {}
impl Message for TsRegistrationPb {}
impl Message for ListTabletServersRequestPb {}
impl Message for ListTabletServersEntryPb {}
impl Message for ListTabletServersResponsePb {}
impl Message for ListMastersRequestPb {}
impl Message for ServerEntryPb {}
impl Message for ListMastersResponsePb {}
