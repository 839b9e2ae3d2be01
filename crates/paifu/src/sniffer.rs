//! The capture loop: frames in, mirrored messages out.
//!
//! ```text
//! FrameSource ──► Demultiplexer ──► Mirror ──► QueueStore
//! ```
//!
//! Frames are handled strictly one at a time. The demultiplexer's
//! pending-request table is the only state carried between frames.

use paifu_capture::{CapturedFrame, FrameSource};
use paifu_mirror::{Dispatch, Mirror, QueueStore};
use paifu_protocol::Demultiplexer;

use crate::{Config, PaifuError};

/// Counts kept over one [`Sniffer::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnifferStats {
    pub frames: usize,
    pub exchanges: usize,
    pub mirrored: usize,
    pub unhandled: usize,
}

pub struct Sniffer<Q> {
    demux: Demultiplexer,
    mirror: Mirror<Q>,
}

impl<Q: QueueStore> Sniffer<Q> {
    pub fn new(demux: Demultiplexer, mirror: Mirror<Q>) -> Self {
        Self { demux, mirror }
    }

    /// A sniffer with the demux policy and routing table of `config`.
    pub fn from_config(config: &Config, queue: Q) -> Self {
        Self::new(
            Demultiplexer::new(config.demux.clone()),
            Mirror::new(config.mirror.clone(), queue),
        )
    }

    pub fn mirror(&self) -> &Mirror<Q> {
        &self.mirror
    }

    /// Handles one frame. Returns `None` while the frame was a request
    /// still waiting for its response.
    ///
    /// # Errors
    /// Non-binary frames, malformed frames and store failures. None of
    /// them leave the sniffer in a state worth continuing from.
    pub async fn handle(&mut self, frame: CapturedFrame) -> Result<Option<Dispatch>, PaifuError> {
        let (direction, content) = frame.into_binary()?;
        let Some(exchange) = self.demux.feed(direction, content)? else {
            return Ok(None);
        };
        Ok(Some(self.mirror.dispatch(&exchange).await?))
    }

    /// Drains `source` until it is exhausted.
    pub async fn run<S>(&mut self, source: &mut S) -> Result<SnifferStats, PaifuError>
    where
        S: FrameSource,
        PaifuError: From<S::Error>,
    {
        let mut stats = SnifferStats::default();
        while let Some(frame) = source.next_frame().await? {
            stats.frames += 1;
            match self.handle(frame).await? {
                None => {}
                Some(Dispatch::Unhandled) => {
                    stats.exchanges += 1;
                    stats.unhandled += 1;
                }
                Some(Dispatch::Dropped) => stats.exchanges += 1,
                Some(Dispatch::Pushed { .. } | Dispatch::Set { .. }) => {
                    stats.exchanges += 1;
                    stats.mirrored += 1;
                }
            }
        }
        tracing::info!(
            frames = stats.frames,
            mirrored = stats.mirrored,
            unhandled = stats.unhandled,
            pending = self.demux.pending_len(),
            "capture exhausted"
        );
        Ok(stats)
    }
}
