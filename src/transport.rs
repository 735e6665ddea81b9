use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio_util::codec::Framed;

use crate::envelope::FrameCodec;
use crate::errors::RpcError;

/// Moves one request frame to a server and brings its response frame back,
/// together with the uuid of the server that answered.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn round_trip(&self, frame: Bytes) -> Result<(Bytes, String), RpcError>;
}

#[async_trait]
impl<T> Transport for Box<T>
where
    T: Transport + ?Sized,
{
    async fn round_trip(&self, frame: Bytes) -> Result<(Bytes, String), RpcError> {
        (**self).round_trip(frame).await
    }
}

/// Transport over a single byte stream to a known server. Calls are
/// serialized: one frame goes out, one frame comes back.
///
/// A round trip that does not finish (cancelled by a timeout, or failed
/// halfway) leaves the stream out of step with the server, so the transport
/// refuses every later call with [`RpcError::ConnectionError`].
pub struct StreamTransport<S> {
    framed: Mutex<Framed<S, FrameCodec>>,
    peer_uuid: String,
    broken: AtomicBool,
}

impl<S> StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S, peer_uuid: impl Into<String>, max_frame_size: usize) -> Self {
        Self {
            framed: Mutex::new(Framed::new(stream, FrameCodec::new(max_frame_size))),
            peer_uuid: peer_uuid.into(),
            broken: AtomicBool::new(false),
        }
    }

    pub fn peer_uuid(&self) -> &str {
        &self.peer_uuid
    }

    pub fn is_broken(&self) -> bool {
        self.broken.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S> Transport for StreamTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn round_trip(&self, frame: Bytes) -> Result<(Bytes, String), RpcError> {
        let mut framed = self.framed.lock().await;
        if self.broken.swap(true, Ordering::SeqCst) {
            return Err(RpcError::ConnectionError(format!(
                "connection to {} is out of sync after an unfinished call",
                self.peer_uuid
            )));
        }

        debug!("Sending {} byte frame to {}", frame.len(), self.peer_uuid);
        framed.send(frame).await?;

        // Stays broken unless the reply arrives intact.
        match framed.next().await {
            Some(Ok(response)) => {
                debug!("Received {} byte frame from {}", response.len(), self.peer_uuid);
                self.broken.store(false, Ordering::SeqCst);
                Ok((response, self.peer_uuid.clone()))
            }
            Some(Err(e)) => {
                warn!("Dropping connection to {}: {}", self.peer_uuid, e);
                Err(e)
            }
            None => Err(RpcError::ConnectionError(format!(
                "connection to {} closed before response",
                self.peer_uuid
            ))),
        }
    }
}
