//! Captured WebSocket frames and the sources that produce them.
//!
//! Paifu never talks to the game server itself. Something else (a
//! browser extension, an intercepting proxy, a dump file) observes the
//! client's WebSocket and hands us each frame together with the side
//! that sent it. This crate is the boundary where those frames enter
//! the pipeline:
//!
//! - [`CapturedFrame`] is one observed frame: direction, opcode, bytes.
//! - [`FrameSource`] is the async trait every producer implements.
//! - [`ReplaySource`] replays frames from memory (tests, dump files).
//! - [`TapListener`] / [`TapConnection`] (feature `websocket`) accept
//!   a live feed over a local WebSocket.
//!
//! # Feature Flags
//!
//! - `websocket` (default): live capture feed via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
mod frame;
mod replay;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::CaptureError;
pub use frame::{CapturedFrame, Direction, Opcode};
pub use replay::ReplaySource;
#[cfg(feature = "websocket")]
pub use websocket::{FeedId, TapConnection, TapListener};

/// Produces captured frames in true network order.
///
/// Implementors yield frames one at a time. The pipeline fully handles
/// each frame before asking for the next, so a source never sees
/// concurrent calls.
pub trait FrameSource {
    /// The error type for this source.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Waits for the next captured frame.
    ///
    /// Returns `Ok(None)` when the capture is exhausted (the feed
    /// closed or the replay ran out).
    async fn next_frame(&mut self) -> Result<Option<CapturedFrame>, Self::Error>;
}
