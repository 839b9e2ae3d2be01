//! Schema-less dumps of protobuf payloads, for diagnostics.
//!
//! When a message has no typed decoder (most lobby traffic) the
//! inspector still turns it into something readable: a JSON object keyed
//! by field number. Length-delimited fields are shown as a nested object
//! if they parse as a message, as a string if they are UTF-8, and as
//! `base64:...` otherwise. Guessing like this is ambiguous by nature;
//! the output is for people, not for further decoding.
//!
//! Nesting is followed [`MAX_INSPECT_DEPTH`] levels deep; anything below
//! that is shown as `base64:...`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use paifu_capture::Direction;
use serde_json::{Map, Value, json};

use crate::envelope::unwrap;
use crate::frame::{Frame, FrameKind};
use crate::wire::{FieldScanner, WireValue};
use crate::{DecodeError, ProtocolError};

/// How many nested messages [`inspect`] descends into.
pub const MAX_INSPECT_DEPTH: usize = 32;

/// Dumps a serialized message.
pub fn inspect(bytes: &[u8]) -> Result<Value, DecodeError> {
    inspect_at(bytes, 0)
}

fn inspect_at(bytes: &[u8], depth: usize) -> Result<Value, DecodeError> {
    let mut object = Map::new();
    for field in FieldScanner::new(bytes) {
        let field = field?;
        let value = match field.value {
            WireValue::Varint(v) | WireValue::Fixed64(v) => json!(v),
            WireValue::Fixed32(v) => json!(v),
            WireValue::Bytes(b) => length_delimited(b, depth + 1),
        };
        let key = field.number.to_string();
        match object.get_mut(&key) {
            None => {
                object.insert(key, value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    Ok(Value::Object(object))
}

fn length_delimited(bytes: &[u8], depth: usize) -> Value {
    if bytes.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(text) = std::str::from_utf8(bytes) {
        if text.chars().all(|c| !c.is_control()) {
            return Value::String(text.to_owned());
        }
    }
    let nested = if depth <= MAX_INSPECT_DEPTH {
        inspect_at(bytes, depth).ok()
    } else {
        None
    };
    nested.unwrap_or_else(|| Value::String(format!("base64:{}", STANDARD.encode(bytes))))
}

/// Dumps an envelope: its name, a dump of its payload and, for action
/// prototypes, the decoded action.
pub fn inspect_envelope(bytes: &[u8]) -> Result<Value, ProtocolError> {
    let unwrapped = unwrap(bytes)?;
    let mut object = Map::new();
    object.insert("name".into(), Value::String(unwrapped.name));
    object.insert("data".into(), inspect(&unwrapped.data)?);
    if let Some(action) = unwrapped.action {
        let record = action
            .record
            .map(|r| serde_json::to_value(r).unwrap_or_default())
            .unwrap_or_else(|| length_delimited(&action.data, 1));
        object.insert(
            "action".into(),
            json!({
                "step": action.step,
                "name": action.name,
                "demasked": action.demasked,
                "record": record,
            }),
        );
    }
    Ok(Value::Object(object))
}

/// Dumps a whole captured message: its frame kind and sequence number
/// followed by [`inspect_envelope`] of the body.
pub fn inspect_frame(content: &[u8]) -> Result<Value, ProtocolError> {
    let frame = Frame::parse(content).map_err(|reason| ProtocolError::MalformedFrame {
        direction: match content.first().copied().and_then(FrameKind::from_byte) {
            Some(FrameKind::Request) => Direction::Outbound,
            _ => Direction::Inbound,
        },
        reason,
        content: content.to_vec(),
    })?;
    let kind = match frame.kind {
        FrameKind::Notify => "notify",
        FrameKind::Request => "request",
        FrameKind::Response => "response",
    };
    let mut value = inspect_envelope(frame.body)?;
    if let Value::Object(object) = &mut value {
        object.insert("kind".into(), json!(kind));
        object.insert("seq".into(), json!(frame.seq));
    }
    Ok(value)
}
