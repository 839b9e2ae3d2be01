//! A single observed WebSocket frame.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CaptureError;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way a frame travelled, seen from the game client.
///
/// Serializes as `"inbound"` / `"outbound"`, the same strings the
/// mirrored-message envelope uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Server to client.
    Inbound,
    /// Client to server.
    Outbound,
}

impl Direction {
    /// Outbound when the client sent the frame.
    pub fn from_client(from_client: bool) -> Self {
        if from_client { Self::Outbound } else { Self::Inbound }
    }

    /// The opposite direction.
    pub fn inverse(self) -> Self {
        match self {
            Self::Inbound => Self::Outbound,
            Self::Outbound => Self::Inbound,
        }
    }

    /// The lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Opcode
// ---------------------------------------------------------------------------

/// The WebSocket message type of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Binary,
    Text,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "BINARY"),
            Self::Text => write!(f, "TEXT"),
        }
    }
}

// ---------------------------------------------------------------------------
// CapturedFrame
// ---------------------------------------------------------------------------

/// Bit 0 of the tap header byte: the client sent the frame.
const TAP_FROM_CLIENT: u8 = 0b01;
/// Bit 1 of the tap header byte: the frame was a text message.
const TAP_TEXT: u8 = 0b10;

/// One frame observed on the game client's WebSocket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// `true` if the client sent the frame.
    pub from_client: bool,
    /// The WebSocket message type.
    pub opcode: Opcode,
    /// The frame payload.
    pub content: Vec<u8>,
}

impl CapturedFrame {
    /// A binary frame.
    pub fn binary(from_client: bool, content: impl Into<Vec<u8>>) -> Self {
        Self {
            from_client,
            opcode: Opcode::Binary,
            content: content.into(),
        }
    }

    /// A text frame.
    pub fn text(from_client: bool, content: impl Into<Vec<u8>>) -> Self {
        Self {
            from_client,
            opcode: Opcode::Text,
            content: content.into(),
        }
    }

    /// The direction derived from [`from_client`](Self::from_client).
    pub fn direction(&self) -> Direction {
        Direction::from_client(self.from_client)
    }

    /// Returns the direction and payload of a binary frame.
    ///
    /// # Errors
    /// Returns [`CaptureError::UnsupportedFrameType`] for any other
    /// opcode.
    pub fn into_binary(self) -> Result<(Direction, Vec<u8>), CaptureError> {
        match self.opcode {
            Opcode::Binary => Ok((Direction::from_client(self.from_client), self.content)),
            other => Err(CaptureError::UnsupportedFrameType(other)),
        }
    }

    /// Encodes the frame as a tap feed message: one header byte
    /// (bit 0 = from client, bit 1 = text) followed by the content.
    pub fn to_tap_bytes(&self) -> Vec<u8> {
        let mut header = 0;
        if self.from_client {
            header |= TAP_FROM_CLIENT;
        }
        if self.opcode == Opcode::Text {
            header |= TAP_TEXT;
        }
        let mut bytes = Vec::with_capacity(self.content.len() + 1);
        bytes.push(header);
        bytes.extend_from_slice(&self.content);
        bytes
    }

    /// Decodes a tap feed message.
    ///
    /// # Errors
    /// Returns [`CaptureError::MalformedFeed`] for an empty message or
    /// a header byte with unknown bits set.
    pub fn from_tap_bytes(bytes: &[u8]) -> Result<Self, CaptureError> {
        let (&header, content) = bytes
            .split_first()
            .ok_or_else(|| CaptureError::MalformedFeed("empty message".into()))?;
        if header & !(TAP_FROM_CLIENT | TAP_TEXT) != 0 {
            return Err(CaptureError::MalformedFeed(format!(
                "unknown header byte {header:#04x}"
            )));
        }
        Ok(Self {
            from_client: header & TAP_FROM_CLIENT != 0,
            opcode: if header & TAP_TEXT != 0 { Opcode::Text } else { Opcode::Binary },
            content: content.to_vec(),
        })
    }
}
