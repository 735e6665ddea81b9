use log::{debug, warn};
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::time::timeout;

use crate::call::RpcCall;
use crate::config::RpcConfig;
use crate::envelope::CallResponse;
use crate::errors::RpcError;
use crate::transport::Transport;
use crate::wire::{ErrorStatusPb, Message, RemoteMethodPb, RequestHeader};

/// Decoded response of a call and the application error that may accompany it.
#[derive(Debug)]
pub struct CallOutcome<R, E> {
    pub response: R,
    pub error: Option<E>,
}

impl<R, E> CallOutcome<R, E> {
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn into_parts(self) -> (R, Option<E>) {
        (self.response, self.error)
    }
}

/// Sends typed calls over a transport. Holds no per-call state besides the
/// call id counter; any number of calls can be dispatched concurrently if
/// the transport allows it.
pub struct CallDispatcher<T> {
    transport: T,
    config: RpcConfig,
    next_call_id: AtomicI32,
}

impl<T: Transport> CallDispatcher<T> {
    pub fn new(transport: T, config: RpcConfig) -> Result<Self, RpcError> {
        config.validate()?;
        Ok(Self {
            transport,
            config,
            next_call_id: AtomicI32::new(0),
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    pub async fn dispatch<C: RpcCall>(
        &self,
        call: &C,
    ) -> Result<CallOutcome<C::Response, C::AppError>, RpcError> {
        let tracker = call.deadline_tracker();
        if tracker.timed_out() {
            return Err(RpcError::Timeout {
                elapsed: tracker.elapsed(),
            });
        }
        let budget = tracker
            .remaining()
            .unwrap_or_else(|| self.config.default_timeout());

        let call_id = self.next_call_id.fetch_add(1, Ordering::SeqCst);
        let header = RequestHeader::new(
            call_id,
            RemoteMethodPb::new(call.service_name(), call.method()),
            budget.as_millis().min(u32::MAX as u128) as u32,
        );

        let frame = call.serialize(&header)?;
        if frame.len() > self.config.max_message_size() {
            return Err(RpcError::MessageTooLarge {
                size: frame.len(),
                max: self.config.max_message_size(),
            });
        }

        debug!(
            "Dispatching {}.{} (call_id={}, {} bytes, timeout={}ms)",
            call.service_name(),
            call.method(),
            call_id,
            frame.len(),
            budget.as_millis()
        );

        let (raw, ts_uuid) = match timeout(budget, self.transport.round_trip(frame)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(RpcError::Timeout {
                    elapsed: tracker.elapsed(),
                })
            }
        };

        let response = CallResponse::parse(raw)?;
        if response.header().call_id != call_id {
            return Err(RpcError::CallIdMismatch {
                expected: call_id,
                actual: response.header().call_id,
            });
        }

        if response.header().is_error {
            let status = ErrorStatusPb::decode(response.pb_message())?;
            warn!(
                "{}.{} failed on {}: {:?} {}",
                call.service_name(),
                call.method(),
                ts_uuid,
                status.code,
                status.message
            );
            return Err(RpcError::Remote {
                code: status.code,
                message: status.message,
            });
        }

        let (response, error) = call.deserialize(&response, &ts_uuid)?;
        if error.is_some() {
            debug!(
                "{}.{} answered by {} with an application error",
                call.service_name(),
                call.method(),
                ts_uuid
            );
        }
        Ok(CallOutcome { response, error })
    }
}
