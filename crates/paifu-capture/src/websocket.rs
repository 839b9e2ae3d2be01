//! Live capture feed over a local WebSocket, using `tokio-tungstenite`.
//!
//! A feeder (typically an intercepting proxy sitting next to the game
//! client) connects to the [`TapListener`] and forwards every frame it
//! observes as one binary WebSocket message in the tap encoding of
//! [`CapturedFrame::to_tap_bytes`].

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use crate::{CaptureError, CapturedFrame, FrameSource};

/// Counter for generating unique feed IDs.
static NEXT_FEED_ID: AtomicU64 = AtomicU64::new(1);

type WsStream = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

/// Identifies one accepted feeder connection in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedId(u64);

impl FeedId {
    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feed-{}", self.0)
    }
}

/// Listens for capture feeders.
pub struct TapListener {
    listener: TcpListener,
}

impl TapListener {
    /// Binds the listener to the given address.
    pub async fn bind(addr: &str) -> Result<Self, CaptureError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(CaptureError::AcceptFailed)?;
        tracing::info!(addr, "capture feed listening");
        Ok(Self { listener })
    }

    /// The address the listener is bound to (useful with port 0).
    pub fn local_addr(&self) -> Result<SocketAddr, CaptureError> {
        self.listener.local_addr().map_err(CaptureError::AcceptFailed)
    }

    /// Waits for the next feeder and completes the WebSocket handshake.
    pub async fn accept(&self) -> Result<TapConnection, CaptureError> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(CaptureError::AcceptFailed)?;

        let ws = tokio_tungstenite::accept_async(stream).await.map_err(|e| {
            CaptureError::AcceptFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                e,
            ))
        })?;

        let id = FeedId(NEXT_FEED_ID.fetch_add(1, Ordering::Relaxed));
        tracing::debug!(%id, %addr, "accepted capture feed");

        Ok(TapConnection { id, ws })
    }
}

/// One feeder connection, yielding the frames it forwards.
pub struct TapConnection {
    id: FeedId,
    ws: WsStream,
}

impl TapConnection {
    /// Returns the feed's identifier.
    pub fn id(&self) -> FeedId {
        self.id
    }
}

impl FrameSource for TapConnection {
    type Error = CaptureError;

    async fn next_frame(&mut self) -> Result<Option<CapturedFrame>, Self::Error> {
        use futures_util::StreamExt;
        loop {
            match self.ws.next().await {
                Some(Ok(Message::Binary(data))) => {
                    return CapturedFrame::from_tap_bytes(&data).map(Some);
                }
                Some(Ok(Message::Text(_))) => {
                    return Err(CaptureError::MalformedFeed(
                        "feed messages must be binary".into(),
                    ));
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(id = %self.id, "capture feed closed");
                    return Ok(None);
                }
                Some(Ok(_)) => continue, // skip ping/pong/frame
                Some(Err(e)) => {
                    return Err(CaptureError::ReceiveFailed(std::io::Error::new(
                        std::io::ErrorKind::ConnectionReset,
                        e,
                    )));
                }
            }
        }
    }
}
