//! Error types for the protocol layer.
//!
//! Two levels of failure live here. [`DecodeError`] is about bytes: a
//! protobuf payload that is truncated, carries an unexpected field, or
//! otherwise fails the strict decoder. [`ProtocolError`] is about the
//! conversation: a frame that fits no known layout, a response nobody
//! asked for, a message flowing the wrong way.

use std::fmt;

use paifu_capture::Direction;

/// Renders bytes as lowercase hex, the way malformed frames are logged.
pub fn hex(bytes: &[u8]) -> String {
    use fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // Writing into a String cannot fail.
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// A protobuf payload the strict decoder refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("truncated message at byte {offset}")]
    Truncated { offset: usize },

    #[error("varint longer than 10 bytes at byte {offset}")]
    VarintOverflow { offset: usize },

    #[error("field number 0 at byte {offset}")]
    ZeroFieldNumber { offset: usize },

    /// Groups (wire types 3 and 4) and the reserved wire types 6 and 7.
    #[error("field {field} uses unsupported wire type {wire_type} at byte {offset}")]
    UnsupportedWireType {
        field: u32,
        wire_type: u8,
        offset: usize,
    },

    #[error("unknown field {field} in {message}")]
    UnknownField { message: &'static str, field: u32 },

    #[error("field {field} ({name}) of {message} must be length-delimited")]
    WrongWireType {
        message: &'static str,
        field: u32,
        name: &'static str,
    },

    #[error("invalid UTF-8 in {context}")]
    InvalidUtf8 { context: &'static str },

    #[error("failed to decode {message}: {source}")]
    Prost {
        message: &'static str,
        #[source]
        source: prost::DecodeError,
    },
}

/// An action payload that decoded neither as sent nor after removing
/// the XOR mask. Both underlying errors are kept.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("action {name} failed to decode directly ({direct}) and after demasking ({demasked})")]
pub struct DecodeFailure {
    pub name: String,
    pub direct: DecodeError,
    pub demasked: DecodeError,
}

/// Why a frame fit none of the three layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    EmptyFrame,
    UnknownType(u8),
    /// Shorter than the type byte plus the 2-byte sequence number.
    Truncated,
    /// A request body that does not start with a method-name field.
    NamePattern,
    /// A response body that does not start with `0a 00 12`.
    ResponsePattern,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFrame => write!(f, "empty frame"),
            Self::UnknownType(t) => write!(f, "unknown frame type {t}"),
            Self::Truncated => write!(f, "truncated header"),
            Self::NamePattern => write!(f, "request body does not start with a method name"),
            Self::ResponsePattern => write!(f, "response body does not start with 0a 00 12"),
        }
    }
}

/// Errors raised while demultiplexing and unwrapping frames.
///
/// `MalformedFrame`, `UnmatchedResponse` and `DirectionMismatch` mean
/// the capture no longer makes sense; callers stop processing the
/// stream when they see one.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed {direction} frame ({reason}): {}", hex(.content))]
    MalformedFrame {
        direction: Direction,
        reason: MalformedReason,
        content: Vec<u8>,
    },

    #[error("{direction} response with sequence number {seq} has no pending request: {}", hex(.content))]
    UnmatchedResponse {
        seq: u16,
        direction: Direction,
        content: Vec<u8>,
    },

    #[error("{name} observed flowing {direction}")]
    DirectionMismatch { name: String, direction: Direction },

    #[error("request {name} with sequence number {seq} replaced a pending request")]
    StaleRequest { seq: u16, name: String },

    #[error("expected message {expected}, found {found}")]
    UnexpectedName { expected: String, found: String },

    #[error("envelope nesting deeper than {limit}")]
    DepthExceeded { limit: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Obfuscated(#[from] DecodeFailure),
}
