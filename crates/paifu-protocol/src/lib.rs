//! Wire protocol of the Mahjong Soul client.
//!
//! This crate turns captured binary frames into named messages:
//!
//! - **Frames** ([`Frame`], [`Demultiplexer`]): the type byte and
//!   sequence number in front of each message, and the pairing of
//!   requests with their responses.
//! - **Envelopes** ([`Envelope`], [`unwrap`]): the `name + data`
//!   wrapper around every body, and the nested action prototype.
//! - **Actions** ([`decode_action`]): live game actions, including the
//!   XOR-masked ones.
//! - **Messages** ([`lq`], [`decode_strict`]): the `.lq` protobuf
//!   messages paifu reads, decoded so that unknown fields are errors.
//!
//! # Architecture
//!
//! ```text
//! Capture (frames) → Demultiplexer (Exchange) → Envelope → lq message
//! ```
//!
//! Nothing here knows about game rules; validating what a message says
//! is the job of `paifu-schema`.

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod action;
mod demux;
mod envelope;
mod error;
pub mod frame;
pub mod inspect;
pub mod lq;
mod record;
mod shape;
pub mod wire;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use action::{ActionRegistry, DecodedAction, decode_action, mask};
pub use demux::{DemuxConfig, Demultiplexer, Exchange, StalePolicy};
pub use envelope::{ACTION_PROTOTYPE, Envelope, MAX_DEPTH, Unwrapped, unwrap};
pub use error::{DecodeError, DecodeFailure, MalformedReason, ProtocolError, hex};
pub use frame::{Frame, FrameKind};
pub use record::{Record, RecordKind};
pub use shape::{FieldDef, FieldKind, Shape, Strict, decode_strict};
