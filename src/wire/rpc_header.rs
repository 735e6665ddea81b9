use serde_derive::{Deserialize, Serialize};

use super::Message;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteMethodPb {
    pub service_name: String,
    pub method_name: String,
}

impl RemoteMethodPb {
    pub fn new(service_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            method_name: method_name.into(),
        }
    }
}

/// Header sent in front of every request body. `call_id` and
/// `remote_method` are required; `Default` yields an unpopulated header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub call_id: Option<i32>,
    pub remote_method: Option<RemoteMethodPb>,
    pub timeout_millis: Option<u32>,
}

impl RequestHeader {
    pub fn new(call_id: i32, remote_method: RemoteMethodPb, timeout_millis: u32) -> Self {
        Self {
            call_id: Some(call_id),
            remote_method: Some(remote_method),
            timeout_millis: Some(timeout_millis),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.call_id.is_some()
            && self.remote_method.as_ref().is_some_and(|method| {
                !method.service_name.is_empty() && !method.method_name.is_empty()
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub call_id: i32,
    pub is_error: bool,
}

impl ResponseHeader {
    pub fn success(call_id: i32) -> Self {
        Self {
            call_id,
            is_error: false,
        }
    }

    pub fn error(call_id: i32) -> Self {
        Self {
            call_id,
            is_error: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RpcErrorCode {
    FatalUnknown,
    ErrorApplication,
    ErrorNoSuchMethod,
    ErrorNoSuchService,
    ErrorServerTooBusy,
    ErrorInvalidRequest,
    FatalServerShuttingDown,
    FatalInvalidRpcHeader,
    FatalDeserializingRequest,
    FatalVersionMismatch,
    FatalUnauthorized,
}

impl RpcErrorCode {
    /// Fatal codes mean the server is closing the connection.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RpcErrorCode::FatalUnknown
                | RpcErrorCode::FatalServerShuttingDown
                | RpcErrorCode::FatalInvalidRpcHeader
                | RpcErrorCode::FatalDeserializingRequest
                | RpcErrorCode::FatalVersionMismatch
                | RpcErrorCode::FatalUnauthorized
        )
    }
}

/// Body of a response whose header has `is_error` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorStatusPb {
    pub message: String,
    pub code: RpcErrorCode,
}

impl ErrorStatusPb {
    pub fn new(code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }
}

impl Message for RemoteMethodPb {}
impl Message for RequestHeader {}
impl Message for ResponseHeader {}
impl Message for ErrorStatusPb {}
