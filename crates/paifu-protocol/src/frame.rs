//! Frame layout.
//!
//! ```text
//! notify:   [0x01][envelope]
//! request:  [0x02][seq: u16 LE][envelope]
//! response: [0x03][seq: u16 LE][envelope with empty name]
//! ```

use crate::{Envelope, MalformedReason};

/// The leading type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Fire-and-forget message; no response follows.
    Notify = 1,
    Request = 2,
    Response = 3,
}

impl FrameKind {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            1 => Some(Self::Notify),
            2 => Some(Self::Request),
            3 => Some(Self::Response),
            _ => None,
        }
    }

    /// Bytes before the envelope: 1 for notifications, 3 otherwise.
    pub fn header_len(self) -> usize {
        match self {
            Self::Notify => 1,
            Self::Request | Self::Response => 3,
        }
    }
}

/// A frame split into its parts, borrowing the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub kind: FrameKind,
    /// `None` for notifications.
    pub seq: Option<u16>,
    pub body: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Splits `content` into type, sequence number and body. Only the
    /// header is checked here; see [`request_name`] and
    /// [`check_response_body`] for the body patterns.
    pub fn parse(content: &'a [u8]) -> Result<Self, MalformedReason> {
        let (&type_byte, rest) = content.split_first().ok_or(MalformedReason::EmptyFrame)?;
        let kind = FrameKind::from_byte(type_byte).ok_or(MalformedReason::UnknownType(type_byte))?;
        if kind == FrameKind::Notify {
            return Ok(Self {
                kind,
                seq: None,
                body: rest,
            });
        }
        let [lo, hi, body @ ..] = rest else {
            return Err(MalformedReason::Truncated);
        };
        Ok(Self {
            kind,
            seq: Some(u16::from_le_bytes([*lo, *hi])),
            body,
        })
    }

    /// Decodes the body as an envelope.
    pub fn envelope(&self) -> Result<Envelope, crate::DecodeError> {
        Envelope::decode(self.body)
    }
}

/// Extracts the method name from a request or notification body.
///
/// The body must start with `0a LEN NAME 12`: a name field shorter than
/// 128 bytes (so its length is a single byte), holding a dot-prefixed
/// UTF-8 identifier, followed by the tag of the data field.
pub fn request_name(body: &[u8]) -> Result<&str, MalformedReason> {
    let [0x0a, len, rest @ ..] = body else {
        return Err(MalformedReason::NamePattern);
    };
    let len = usize::from(*len);
    if len >= 0x80 || rest.len() <= len || rest[len] != 0x12 {
        return Err(MalformedReason::NamePattern);
    }
    let name = std::str::from_utf8(&rest[..len]).map_err(|_| MalformedReason::NamePattern)?;
    if !name.starts_with('.') {
        return Err(MalformedReason::NamePattern);
    }
    Ok(name)
}

/// Checks that a response body carries an empty name: `0a 00 12`.
pub fn check_response_body(body: &[u8]) -> Result<(), MalformedReason> {
    if body.starts_with(&[0x0a, 0x00, 0x12]) {
        Ok(())
    } else {
        Err(MalformedReason::ResponsePattern)
    }
}

/// Builds a notification frame.
pub fn notify_frame(name: &str, data: &[u8]) -> Vec<u8> {
    build(FrameKind::Notify, None, &Envelope::new(name, data))
}

/// Builds a request frame.
pub fn request_frame(seq: u16, name: &str, data: &[u8]) -> Vec<u8> {
    build(FrameKind::Request, Some(seq), &Envelope::new(name, data))
}

/// Builds a response frame.
pub fn response_frame(seq: u16, data: &[u8]) -> Vec<u8> {
    build(FrameKind::Response, Some(seq), &Envelope::new("", data))
}

fn build(kind: FrameKind, seq: Option<u16>, envelope: &Envelope) -> Vec<u8> {
    let body = envelope.encode();
    let mut out = Vec::with_capacity(kind.header_len() + body.len());
    out.push(kind as u8);
    if let Some(seq) = seq {
        out.extend_from_slice(&seq.to_le_bytes());
    }
    out.extend_from_slice(&body);
    out
}
