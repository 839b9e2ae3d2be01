//! # paifu
//!
//! Capture, mirror and archive Mahjong Soul game records.
//!
//! The pipeline is split in two processes joined by a queue:
//!
//! ```text
//! sniffer:   FrameSource ─► Demultiplexer ─► Mirror ─► QueueStore
//! archiver:  QueueStore ─► validate ─► GameRecord ─► BlobStore
//! ```
//!
//! This crate wires the layers together and re-exports them:
//!
//! - [`tile`]: tiles, seats and the meld tables
//! - [`capture`]: captured frames and their sources
//! - [`protocol`]: framing, envelopes and the `.lq` messages
//! - [`schema`]: strict validation of game details
//! - [`record`]: turn-by-turn game reconstruction
//! - [`mirror`]: the routing table and storage traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use paifu::prelude::*;
//!
//! # async fn run() -> Result<(), PaifuError> {
//! let config = Config::from_path("paifu.json")?;
//! paifu::logging::try_init(&config.logging)?;
//!
//! let mut sniffer = Sniffer::from_config(&config, MemoryQueue::new());
//! let mut source = ReplaySource::default();
//! sniffer.run(&mut source).await?;
//! # Ok(())
//! # }
//! ```

mod archiver;
mod config;
mod error;
pub mod logging;
mod sniffer;

pub use archiver::{Archived, Archiver, object_key};
pub use config::{ArchiveConfig, Config, LoggingConfig};
pub use error::PaifuError;
pub use sniffer::{Sniffer, SnifferStats};

pub use paifu_capture as capture;
pub use paifu_mirror as mirror;
pub use paifu_protocol as protocol;
pub use paifu_record as record;
pub use paifu_schema as schema;
pub use paifu_tile as tile;

/// Convenient re-exports for wiring a pipeline.
pub mod prelude {
    pub use crate::{ArchiveConfig, Archived, Archiver, Config, PaifuError, Sniffer};
    pub use paifu_capture::{CapturedFrame, Direction, FrameSource, ReplaySource};
    #[cfg(feature = "websocket")]
    pub use paifu_capture::{TapConnection, TapListener};
    pub use paifu_mirror::{
        BlobStore, MemoryBlobStore, MemoryQueue, Mirror, MirrorConfig, MirroredMessage, QueueStore,
    };
    pub use paifu_record::{GameRecord, build_game_record};
}
