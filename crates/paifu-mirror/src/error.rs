//! Error types for the mirror layer.

/// Errors raised while loading a routing table.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The table is not valid JSON, has unknown keys, or an action
    /// that is neither `"NOP"` nor a command object.
    #[error("invalid mirror config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Message names are fully qualified and start with a dot.
    #[error("{0}: message names must start with `.`")]
    InvalidName(String),

    #[error("{name}: {reason}")]
    InvalidAction { name: String, reason: String },
}

/// Errors raised by a queue or blob store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("key {0} not found")]
    NotFound(String),

    /// The backend failed; the message is backend-specific.
    #[error("store backend failed: {0}")]
    Backend(String),
}

/// Errors raised while mirroring or reading back a mirrored message.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("malformed mirrored message: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed base64 in mirrored message: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("{0}: an invalid timestamp")]
    Timestamp(String),
}
