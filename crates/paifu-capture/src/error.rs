use crate::Opcode;

/// Errors that can occur while receiving captured frames.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// The captured frame was not a binary WebSocket message. The game
    /// protocol is binary-only, so anything else means the capture is
    /// looking at the wrong socket.
    #[error("unsupported WebSocket message type: {0}")]
    UnsupportedFrameType(Opcode),

    /// A feed message did not follow the tap encoding.
    #[error("malformed feed message: {0}")]
    MalformedFeed(String),

    /// Receiving from the feed failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or accepting a feed connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
