//! In-memory frame source.

use std::collections::VecDeque;

use crate::{CaptureError, CapturedFrame, FrameSource};

/// Replays a fixed list of frames in order, then reports exhaustion.
#[derive(Debug, Default, Clone)]
pub struct ReplaySource {
    frames: VecDeque<CapturedFrame>,
}

impl ReplaySource {
    /// Creates a source that yields `frames` in order.
    pub fn new(frames: impl IntoIterator<Item = CapturedFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Appends a frame to the end of the replay.
    pub fn push(&mut self, frame: CapturedFrame) {
        self.frames.push_back(frame);
    }

    /// Number of frames not yet yielded.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` once every frame has been yielded.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl FrameSource for ReplaySource {
    type Error = CaptureError;

    async fn next_frame(&mut self) -> Result<Option<CapturedFrame>, Self::Error> {
        Ok(self.frames.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replay_source_yields_in_order_then_none() {
        let mut source = ReplaySource::new([
            CapturedFrame::binary(true, vec![1]),
            CapturedFrame::binary(false, vec![2]),
        ]);
        assert_eq!(source.len(), 2);
        assert_eq!(source.next_frame().await.unwrap().unwrap().content, vec![1]);
        assert_eq!(source.next_frame().await.unwrap().unwrap().content, vec![2]);
        assert!(source.next_frame().await.unwrap().is_none());
        assert!(source.is_empty());
    }
}
