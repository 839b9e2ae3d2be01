//! Unified error type for paifu.

use std::path::PathBuf;

use paifu_capture::{CaptureError, Direction};
use paifu_mirror::{ConfigError, MirrorError, StoreError};
use paifu_protocol::ProtocolError;
use paifu_record::BuildError;
use paifu_schema::ValidationError;
use paifu_tile::InvalidValue;

/// Top-level error that wraps all crate-specific errors.
///
/// Every variant is fatal for the process that raised it: the binaries
/// log it once and exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum PaifuError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    InvalidValue(#[from] InvalidValue),

    #[error(transparent)]
    MirrorConfig(#[from] ConfigError),

    #[error(transparent)]
    Mirror(#[from] MirrorError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Only the client fetches game records, so an archived exchange
    /// must have been requested outbound.
    #[error("an outbound WebSocket message is expected, but got an {0} one")]
    UnexpectedDirection(Direction),

    #[error("the mirrored {0} message carries no response")]
    MissingResponse(String),

    #[error("failed to serialize the game record: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to install the log subscriber: {0}")]
    Logging(String),
}
