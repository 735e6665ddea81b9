//! Typed RPC calls against a distributed database's control plane.
//!
//! Each remote operation is an [`RpcCall`]: it knows its service and method
//! names, encodes its request behind a [`wire::RequestHeader`], and decodes
//! its response into a typed record plus an optional application error.
//! A [`CallDispatcher`] drives any call over a [`Transport`].
//!
//! ```no_run
//! use clusterrpc::{CallDispatcher, ListTabletServersCall, RpcConfig, StreamTransport, TargetTable};
//!
//! # async fn run() -> Result<(), clusterrpc::RpcError> {
//! let config = RpcConfig::from_env();
//! let stream = tokio::net::TcpStream::connect("127.0.0.1:7100").await?;
//! let transport = StreamTransport::new(stream, "master-1", config.max_message_size());
//! let dispatcher = CallDispatcher::new(transport, config)?;
//!
//! let outcome = dispatcher
//!     .dispatch(&ListTabletServersCall::new(TargetTable::master()))
//!     .await?;
//! for server in outcome.response.servers() {
//!     println!("{}", server);
//! }
//! # Ok(())
//! # }
//! ```

pub mod call;
pub mod calls;
pub mod config;
pub mod deadline;
pub mod dispatch;
pub mod envelope;
pub mod errors;
pub mod response;
pub mod server_info;
pub mod transport;
pub mod wire;

pub use call::{CallState, RpcCall, TargetTable};
pub use calls::{ListMastersCall, ListTabletServersCall, PingCall};
pub use config::{RpcConfig, DEFAULT_TIMEOUT};
pub use deadline::{Clock, DeadlineTracker, ManualClock, MonotonicClock};
pub use dispatch::{CallDispatcher, CallOutcome};
pub use envelope::{CallResponse, Frame, FrameCodec};
pub use errors::RpcError;
pub use response::{CallResult, ListMastersResponse, ListTabletServersResponse, PingResponse};
pub use server_info::ServerInfo;
pub use transport::{StreamTransport, Transport};
