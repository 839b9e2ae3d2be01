//! Rule-driven mirroring of captured exchanges for paifu.
//!
//! The sniffer sees every message the game client exchanges with the
//! server, but only a handful matter downstream. A [`MirrorConfig`]
//! names them, and the [`Mirror`] forwards each match to a
//! [`QueueStore`] as a [`MirroredMessage`]:
//!
//! ```text
//! Exchange ──► rule lookup ──► direction filter ──► action
//!                  │                  │              ├─ NOP
//!                  └── none ──────────┴─► warn       ├─ LPUSH / LPUSHX / RPUSH / RPUSHX
//!                                                    └─ SET (ex, px, nx, xx)
//! ```
//!
//! # Key types
//!
//! - [`MirrorConfig`] / [`Rule`] / [`Action`]: the routing table
//! - [`Mirror`]: applies the table to exchanges
//! - [`MirroredMessage`]: the base64 JSON envelope written to the queue
//! - [`QueueStore`] / [`BlobStore`]: the storage collaborators
//! - [`MemoryQueue`] / [`MemoryBlobStore`]: in-process implementations

#![allow(async_fn_in_trait)]

mod config;
mod error;
mod memory;
mod message;
mod mirror;
mod store;

pub use config::{Action, Command, DirectionFilter, MirrorConfig, Rule};
pub use error::{ConfigError, MirrorError, StoreError};
pub use memory::{MemoryBlobStore, MemoryQueue};
pub use message::MirroredMessage;
pub use mirror::{Dispatch, Mirror, heartbeat, read_heartbeat};
pub use store::{BlobStore, PushCommand, QueueStore, SetOptions};
