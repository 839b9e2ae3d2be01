//! The `name + data` wrapper around every message body.
//!
//! Every frame body, and every record inside a game detail, is an
//! [`Envelope`]: field 1 holds the fully-qualified message name (for
//! example `.lq.Lobby.fetchGameRecord`), field 2 the serialized
//! message. Responses carry an empty name; their identity comes from
//! the request they answer.
//!
//! [`unwrap`] peels an envelope and, for `.lq.ActionPrototype`, the
//! second layer as well, handing the inner payload to
//! [`decode_action`](crate::decode_action).

use crate::lq::ActionPrototype;
use crate::shape::decode_strict;
use crate::wire::{FieldScanner, WireValue, write_bytes_field};
use crate::{DecodeError, DecodedAction, ProtocolError, decode_action};

/// The message name of the nested-action wrapper.
pub const ACTION_PROTOTYPE: &str = ".lq.ActionPrototype";

/// How many envelope layers [`unwrap`] will peel.
pub const MAX_DEPTH: usize = 2;

/// A decoded wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Envelope {
    pub name: String,
    pub data: Vec<u8>,
}

impl Envelope {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Decodes a wrapper. Fields other than 1 and 2 are rejected.
    ///
    /// A missing field decodes as empty, the usual protobuf default.
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut envelope = Self::default();
        for field in FieldScanner::new(bytes) {
            let field = field?;
            let WireValue::Bytes(value) = field.value else {
                return Err(match field.number {
                    1 | 2 => DecodeError::WrongWireType {
                        message: "Wrapper",
                        field: field.number,
                        name: if field.number == 1 { "name" } else { "data" },
                    },
                    other => DecodeError::UnknownField {
                        message: "Wrapper",
                        field: other,
                    },
                });
            };
            match field.number {
                1 => {
                    envelope.name = std::str::from_utf8(value)
                        .map_err(|_| DecodeError::InvalidUtf8 {
                            context: "Wrapper.name",
                        })?
                        .to_owned();
                }
                2 => envelope.data = value.to_vec(),
                other => {
                    return Err(DecodeError::UnknownField {
                        message: "Wrapper",
                        field: other,
                    });
                }
            }
        }
        Ok(envelope)
    }

    /// Encodes the wrapper. Both fields are always written, even when
    /// empty, which is how the game client frames them: a response body
    /// therefore always starts with `0a 00 12`.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.name.len() + self.data.len() + 6);
        write_bytes_field(&mut out, 1, self.name.as_bytes());
        write_bytes_field(&mut out, 2, &self.data);
        out
    }

    /// Returns the payload if the wrapper carries the expected name.
    pub fn expect_name(self, expected: &str) -> Result<Vec<u8>, ProtocolError> {
        if self.name == expected {
            Ok(self.data)
        } else {
            Err(ProtocolError::UnexpectedName {
                expected: expected.to_owned(),
                found: self.name,
            })
        }
    }
}

/// The result of peeling a message body.
#[derive(Debug, Clone, PartialEq)]
pub struct Unwrapped {
    /// The outer message name.
    pub name: String,
    /// The outer payload, untouched.
    pub data: Vec<u8>,
    /// Present when the outer message was an action prototype.
    pub action: Option<DecodedAction>,
}

/// Peels one envelope and, if it wraps an action prototype, the action
/// inside it.
///
/// An action prototype that names another action prototype would need a
/// third layer; that is refused with [`ProtocolError::DepthExceeded`].
pub fn unwrap(bytes: &[u8]) -> Result<Unwrapped, ProtocolError> {
    let Envelope { name, data } = Envelope::decode(bytes)?;
    if name != ACTION_PROTOTYPE {
        return Ok(Unwrapped {
            name,
            data,
            action: None,
        });
    }

    let prototype: ActionPrototype = decode_strict(&data)?;
    if prototype.name == ACTION_PROTOTYPE {
        return Err(ProtocolError::DepthExceeded { limit: MAX_DEPTH });
    }
    let action = decode_action(&prototype)?;
    Ok(Unwrapped {
        name,
        data,
        action: Some(action),
    })
}
